//! PostgreSQL-backed credential store.
//!
//! One table, one row per account. Secret and token columns hold
//! AES-256-GCM ciphertexts, never plaintext.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;

use super::CredentialStore;
use crate::config::{Config, DB_PORT};
use crate::crypto::CryptoEngine;
use crate::error::WardenError;

pub struct PgCredentialStore {
    pool: PgPool,
    crypto: CryptoEngine,
}

impl PgCredentialStore {
    /// Connect to PostgreSQL from the discrete host/user/password settings.
    /// The port is fixed for the managed database fleet.
    pub async fn connect(config: &Config, crypto: CryptoEngine) -> Result<Self, WardenError> {
        let options = PgConnectOptions::new()
            .host(&config.db_host)
            .port(DB_PORT)
            .username(&config.db_user)
            .password(&config.db_password)
            .database(&config.db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(config.http_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| WardenError::Database(format!("Failed to connect to PostgreSQL: {e}")))?;

        Ok(Self { pool, crypto })
    }

    /// Run schema migrations.
    pub async fn migrate(&self) -> Result<(), WardenError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS access_credentials (
                account_id      TEXT PRIMARY KEY,
                client_id       TEXT NOT NULL,
                client_secret   TEXT NOT NULL,
                access_token    TEXT NOT NULL,
                refresh_token   TEXT,
                access_token_refreshdate DATE,
                updated_at      TIMESTAMPTZ DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn update_tokens(
        &self,
        account_id: &str,
        access_token: &str,
        rotated_refresh_token: Option<&str>,
        refreshed_at: NaiveDate,
    ) -> Result<(), WardenError> {
        let enc_access = self.crypto.encrypt(access_token)?;
        let enc_refresh = match rotated_refresh_token {
            Some(rt) => Some(self.crypto.encrypt(rt)?),
            None => None,
        };

        // Scoped transaction: commit on success, rollback on any early
        // return when the guard drops.
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            UPDATE access_credentials
            SET access_token = $1,
                refresh_token = COALESCE($2, refresh_token),
                access_token_refreshdate = $3,
                updated_at = NOW()
            WHERE account_id = $4
            "#,
        )
        .bind(&enc_access)
        .bind(&enc_refresh)
        .bind(refreshed_at)
        .bind(account_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(WardenError::NotFound("credential record".into()));
        }

        tx.commit().await?;

        Ok(())
    }
}
