//! Cron-cadence trigger loop.
//!
//! Generalizes a fixed-interval daemon loop to a cron expression evaluated
//! in a configurable timezone. A failed run is logged and the loop keeps
//! going; only a broken schedule configuration is fatal.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

use super::orchestrator::Orchestrator;
use crate::credential::CredentialRecord;
use crate::error::WardenError;
use crate::oauth::{TokenRefresher, TokenVerifier};
use crate::store::CredentialStore;

/// Parse a 6-field cron expression (sec min hour day month weekday).
pub fn parse_schedule(expr: &str) -> Result<Schedule, WardenError> {
    Schedule::from_str(expr)
        .map_err(|e| WardenError::Config(format!("Invalid cron expression {expr:?}: {e}")))
}

/// Parse an IANA timezone name, e.g. "America/Sao_Paulo".
pub fn parse_timezone(name: &str) -> Result<Tz, WardenError> {
    name.parse::<Tz>()
        .map_err(|e| WardenError::Config(format!("Invalid timezone {name:?}: {e}")))
}

/// Next fire time strictly after `after`, evaluated in `tz`.
pub fn next_fire(schedule: &Schedule, tz: Tz, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule
        .after(&after.with_timezone(&tz))
        .next()
        .map(|t| t.with_timezone(&Utc))
}

/// Run the orchestrator forever on the configured cadence.
///
/// The loop owns the current credential record: a persisted refresh hands
/// the rotated record to the next run, a failed run leaves it as it was.
pub async fn run_loop<V, R, S>(
    orchestrator: &Orchestrator<V, R, S>,
    seed: CredentialRecord,
    cron_expr: &str,
    tz_name: &str,
) -> Result<(), WardenError>
where
    V: TokenVerifier,
    R: TokenRefresher,
    S: CredentialStore,
{
    let schedule = parse_schedule(cron_expr)?;
    let tz = parse_timezone(tz_name)?;

    let mut credential = seed;
    info!("Validation schedule started (cron: {cron_expr}, tz: {tz_name})");

    loop {
        let Some(next) = next_fire(&schedule, tz, Utc::now()) else {
            return Err(WardenError::Config(format!(
                "Cron expression {cron_expr:?} has no upcoming fire time"
            )));
        };

        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        info!("Next validation run at {next}");
        tokio::time::sleep(wait).await;

        match orchestrator.run(&credential).await {
            Ok(report) => credential = report.credential,
            Err(e) => error!("Validation run failed: {e}"),
        }
    }
}
