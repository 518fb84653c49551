use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::traits::{ProbeOutcome, TokenVerifier};

/// Probes a read-only resource endpoint with the bearer token.
///
/// The probe never mutates anything; its only output is the tri-state
/// outcome. A 401 is the sole signal that the token is expired — every
/// other non-200 answer is ambiguous and must not cause a refresh.
pub struct HttpVerifier {
    http: reqwest::Client,
    probe_url: String,
}

impl HttpVerifier {
    pub fn new(http: reqwest::Client, probe_url: String) -> Self {
        Self { http, probe_url }
    }
}

#[async_trait]
impl TokenVerifier for HttpVerifier {
    async fn verify(&self, access_token: &str) -> ProbeOutcome {
        let resp = self
            .http
            .get(&self.probe_url)
            .bearer_auth(access_token)
            .send()
            .await;

        match resp {
            Ok(r) => match r.status() {
                StatusCode::OK => ProbeOutcome::Valid,
                StatusCode::UNAUTHORIZED => ProbeOutcome::Expired,
                status => {
                    debug!("Probe returned unexpected status {status}");
                    ProbeOutcome::Unknown {
                        reason: format!("probe returned status {status}"),
                    }
                }
            },
            Err(e) => ProbeOutcome::Unknown {
                reason: format!("probe request failed: {e}"),
            },
        }
    }
}
