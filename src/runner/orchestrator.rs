//! The credential validation state machine.
//!
//! One run is strictly sequential: probe the resource, refresh only on a
//! definite 401, persist only after a complete refresh. Each failure is a
//! terminal outcome for the run; the store is never touched on a partial
//! result.

use chrono::Utc;
use tracing::{info, warn};

use crate::credential::CredentialRecord;
use crate::error::WardenError;
use crate::oauth::{ProbeOutcome, TokenRefresher, TokenVerifier};
use crate::store::CredentialStore;

/// Successful terminal states of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The probe answered 200; nothing was refreshed or written.
    Valid,
    /// The token was refreshed and the store updated.
    Refreshed,
}

/// What a run produced. `credential` is the record subsequent runs should
/// hold: unchanged for a no-op run, rotated after a persisted refresh.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub credential: CredentialRecord,
}

pub struct Orchestrator<V, R, S> {
    verifier: V,
    refresher: R,
    store: S,
}

impl<V, R, S> Orchestrator<V, R, S>
where
    V: TokenVerifier,
    R: TokenRefresher,
    S: CredentialStore,
{
    pub fn new(verifier: V, refresher: R, store: S) -> Self {
        Self {
            verifier,
            refresher,
            store,
        }
    }

    /// Execute one validation run against the given credential.
    ///
    /// The input record is never mutated; a refreshed credential comes back
    /// in the report. On any error the caller keeps its current record and
    /// the store is exactly as it was (the refreshed-but-unpersisted case
    /// is surfaced as the error itself).
    pub async fn run(&self, credential: &CredentialRecord) -> Result<RunReport, WardenError> {
        match self.verifier.verify(&credential.access_token).await {
            ProbeOutcome::Valid => {
                info!(account_id = %credential.account_id, "Access token valid, nothing to do");
                Ok(RunReport {
                    outcome: RunOutcome::Valid,
                    credential: credential.clone(),
                })
            }
            ProbeOutcome::Unknown { reason } => {
                warn!(account_id = %credential.account_id, "Verification inconclusive: {reason}");
                Err(WardenError::AmbiguousVerification(reason))
            }
            ProbeOutcome::Expired => {
                info!(account_id = %credential.account_id, "Access token expired, refreshing");

                let tokens = self.refresher.refresh(credential).await?;
                let rotated = tokens.refresh_token.is_some();

                let today = Utc::now().date_naive();
                let updated = credential.refreshed(&tokens, today);

                self.store
                    .update_tokens(
                        &updated.account_id,
                        &updated.access_token,
                        tokens.refresh_token.as_deref(),
                        today,
                    )
                    .await?;

                info!(
                    account_id = %credential.account_id,
                    rotated_refresh_token = rotated,
                    "Credential refreshed and persisted"
                );

                Ok(RunReport {
                    outcome: RunOutcome::Refreshed,
                    credential: updated,
                })
            }
        }
    }
}
