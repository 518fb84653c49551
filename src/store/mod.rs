//! Credential store — PostgreSQL persistence for the managed credential.

pub mod db;

pub use db::PgCredentialStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::WardenError;

/// Durable sink for the outcome of a successful refresh.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Conditionally update the credential row matched on `account_id`.
    ///
    /// The access token and refresh date always change together; the stored
    /// refresh token is replaced only when `rotated_refresh_token` is
    /// `Some`. Zero matched rows is an error (the record is provisioned
    /// out-of-band, never created here).
    async fn update_tokens(
        &self,
        account_id: &str,
        access_token: &str,
        rotated_refresh_token: Option<&str>,
        refreshed_at: NaiveDate,
    ) -> Result<(), WardenError>;
}
