//! The credential record that flows through a validation run.
//!
//! The record is a plain immutable value: a run receives one, and a
//! successful refresh produces a new one. Nothing mutates a record in
//! place, so two runs given the same inputs behave identically.

use chrono::NaiveDate;

use crate::config::Config;
use crate::oauth::TokenSet;

/// The single credential pair this service maintains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Opaque tenant key the store row is matched on.
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Date of the last refresh observed by this process; `None` until the
    /// first one.
    pub refreshed_at: Option<NaiveDate>,
}

impl CredentialRecord {
    /// Seed record for the process, built from environment configuration.
    /// The row itself is provisioned out-of-band; this only carries the
    /// credential material the run needs in memory.
    pub fn from_config(config: &Config) -> Self {
        Self {
            account_id: config.account_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            access_token: config.access_token.clone(),
            refresh_token: config.refresh_token.clone(),
            refreshed_at: None,
        }
    }

    /// New record after a successful token exchange.
    ///
    /// The refresh token is replaced only when the authorization server
    /// returned one; otherwise the previous value is carried forward. It is
    /// never cleared.
    pub fn refreshed(&self, tokens: &TokenSet, on: NaiveDate) -> Self {
        Self {
            account_id: self.account_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            access_token: tokens.access_token.clone(),
            refresh_token: tokens
                .refresh_token
                .clone()
                .unwrap_or_else(|| self.refresh_token.clone()),
            refreshed_at: Some(on),
        }
    }
}
