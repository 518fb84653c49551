use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::credential::CredentialRecord;
use crate::error::WardenError;

/// A set of tokens returned by the authorization server after a refresh
/// exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    /// Present only when the server rotated the refresh token. Callers must
    /// carry the previous one forward when this is `None`.
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}

/// What the authenticated probe said about the current access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The resource answered 200; the token is usable as-is.
    Valid,
    /// The resource answered 401; the token must be refreshed.
    Expired,
    /// Anything else: unexpected status, timeout, transport failure.
    /// Ambiguous results never trigger a refresh.
    Unknown { reason: String },
}

/// Checks whether the current access token is usable against the real
/// service.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, access_token: &str) -> ProbeOutcome;
}

/// Performs the refresh_token grant exchange.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// On success the returned `TokenSet` is complete; on any failure the
    /// caller sees an error and no partial credential.
    async fn refresh(&self, credential: &CredentialRecord) -> Result<TokenSet, WardenError>;
}
