use anyhow::{Context, Result};

/// The managed database always listens on this port; everything else about
/// the connection comes from the environment.
pub const DB_PORT: u16 = 25060;

/// Application configuration, loaded from environment variables once at
/// startup and passed by reference from there on.
#[derive(Debug, Clone)]
pub struct Config {
    // ── Credential seed ─────────────────────────────────────────────────
    /// Opaque store key for the managed credential row.
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub access_token: String,

    // ── Endpoints ───────────────────────────────────────────────────────
    /// Authorization server token endpoint (refresh_token grant).
    pub token_url: String,
    /// Read-only resource endpoint probed with the bearer token.
    pub probe_url: String,

    // ── Database (PostgreSQL) ───────────────────────────────────────────
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,

    // ── Crypto ──────────────────────────────────────────────────────────
    /// 32-byte base64-encoded master key for AES-256-GCM at-rest encryption.
    pub master_key: String,

    // ── Trigger ─────────────────────────────────────────────────────────
    /// 6-field cron expression. Absent means: run once and exit, letting an
    /// external scheduler own the cadence.
    pub schedule_cron: Option<String>,
    /// IANA timezone the cron expression is evaluated in.
    pub schedule_tz: String,

    // ── HTTP ────────────────────────────────────────────────────────────
    /// Request and connect timeout for all outbound calls, in seconds.
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            account_id: std::env::var("ACCOUNT_ID")
                .context("ACCOUNT_ID is required (store key for the credential row)")?,
            client_id: std::env::var("OAUTH_CLIENT_ID")
                .context("OAUTH_CLIENT_ID is required")?,
            client_secret: std::env::var("OAUTH_CLIENT_SECRET")
                .context("OAUTH_CLIENT_SECRET is required")?,
            refresh_token: std::env::var("OAUTH_REFRESH_TOKEN")
                .context("OAUTH_REFRESH_TOKEN is required")?,
            access_token: std::env::var("OAUTH_ACCESS_TOKEN")
                .context("OAUTH_ACCESS_TOKEN is required")?,

            token_url: std::env::var("OAUTH_TOKEN_URL")
                .context("OAUTH_TOKEN_URL is required (authorization server token endpoint)")?,
            probe_url: std::env::var("API_PROBE_URL")
                .context("API_PROBE_URL is required (authenticated read-only resource)")?,

            db_host: std::env::var("POSTGRES_HOST").context("POSTGRES_HOST is required")?,
            db_user: std::env::var("POSTGRES_USER").context("POSTGRES_USER is required")?,
            db_password: std::env::var("POSTGRES_PASSWORD")
                .context("POSTGRES_PASSWORD is required")?,
            db_name: std::env::var("POSTGRES_DB").unwrap_or_else(|_| "credentials".into()),

            master_key: std::env::var("MASTER_KEY")
                .context("MASTER_KEY is required (32 bytes, base64)")?,

            schedule_cron: std::env::var("SCHEDULE_CRON").ok(),
            schedule_tz: std::env::var("SCHEDULE_TZ").unwrap_or_else(|_| "UTC".into()),

            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .context("Invalid HTTP_TIMEOUT_SECS")?,
        })
    }
}
