//! The two outbound OAuth surfaces: the authenticated probe that decides
//! whether the access token is still usable, and the refresh_token grant
//! that rotates it.

mod refresher;
mod traits;
mod verifier;

pub use refresher::HttpRefresher;
pub use traits::{ProbeOutcome, TokenRefresher, TokenSet, TokenVerifier};
pub use verifier::HttpVerifier;

use std::time::Duration;

/// Shared HTTP client for all outbound calls, with explicit request and
/// connect timeouts so a dead endpoint cannot hang a run indefinitely.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, crate::error::WardenError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| crate::error::WardenError::Config(format!("Failed to build HTTP client: {e}")))
}
