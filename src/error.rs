/// Unified error type for the tokenwarden service.
///
/// Every variant is a terminal outcome of a run step; the trigger layer
/// logs it and either keeps the loop alive or exits nonzero. None of these
/// are ever allowed to escape as a panic.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    // ── Run outcomes ────────────────────────────────────────────────────
    #[error("Ambiguous verification: {0}")]
    AmbiguousVerification(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("{0} not found")]
    NotFound(String),

    // ── Infrastructure ──────────────────────────────────────────────────
    #[error("Database error: {0}")]
    Database(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<sqlx::Error> for WardenError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {e}");
        WardenError::Database(e.to_string())
    }
}
