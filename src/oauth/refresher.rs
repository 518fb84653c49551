use async_trait::async_trait;
use serde::Deserialize;

use super::traits::{TokenRefresher, TokenSet};
use crate::credential::CredentialRecord;
use crate::error::WardenError;

/// Exchanges the long-lived refresh token for a new access token at the
/// authorization server's token endpoint.
pub struct HttpRefresher {
    http: reqwest::Client,
    token_url: String,
}

// Raw token response from the authorization server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
}

impl HttpRefresher {
    pub fn new(http: reqwest::Client, token_url: String) -> Self {
        Self { http, token_url }
    }
}

#[async_trait]
impl TokenRefresher for HttpRefresher {
    async fn refresh(&self, credential: &CredentialRecord) -> Result<TokenSet, WardenError> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &credential.refresh_token),
                ("client_id", &credential.client_id),
                ("client_secret", &credential.client_secret),
            ])
            .send()
            .await
            .map_err(|e| WardenError::RefreshFailed(format!("Refresh request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WardenError::RefreshFailed(format!(
                "Token endpoint returned status {status}: {body}"
            )));
        }

        let token_resp: TokenResponse = resp.json().await.map_err(|e| {
            WardenError::RefreshFailed(format!("Failed to parse refresh response: {e}"))
        })?;

        Ok(TokenSet {
            access_token: token_resp.access_token,
            // The server does not always rotate the refresh token
            refresh_token: token_resp.refresh_token,
            token_type: token_resp.token_type,
            expires_in: token_resp.expires_in,
            scope: token_resp.scope,
        })
    }
}
