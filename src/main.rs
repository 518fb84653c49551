use anyhow::Result;
use tracing::{error, info};

use tokenwarden::config::Config;
use tokenwarden::credential::CredentialRecord;
use tokenwarden::crypto::CryptoEngine;
use tokenwarden::oauth::{self, HttpRefresher, HttpVerifier};
use tokenwarden::runner::{scheduler, Orchestrator, RunOutcome};
use tokenwarden::store::PgCredentialStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokenwarden=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env()?;
    info!("tokenwarden v{}", env!("CARGO_PKG_VERSION"));

    // Initialize components
    let crypto = CryptoEngine::new(&config.master_key)?;
    let store = PgCredentialStore::connect(&config, crypto).await?;
    store.migrate().await?;
    info!("Database connected and migrated ✓");

    let http = oauth::http_client(config.http_timeout_secs)?;
    let verifier = HttpVerifier::new(http.clone(), config.probe_url.clone());
    let refresher = HttpRefresher::new(http, config.token_url.clone());
    let orchestrator = Orchestrator::new(verifier, refresher, store);

    let credential = CredentialRecord::from_config(&config);

    match &config.schedule_cron {
        // In-process cadence: the loop owns the credential record and
        // survives failed runs.
        Some(expr) => {
            scheduler::run_loop(&orchestrator, credential, expr, &config.schedule_tz).await?;
            Ok(())
        }
        // Single run: an external scheduler owns the cadence and reads the
        // exit code.
        None => match orchestrator.run(&credential).await {
            Ok(report) => {
                match report.outcome {
                    RunOutcome::Valid => info!("Run complete: token valid, store untouched"),
                    RunOutcome::Refreshed => info!("Run complete: credential refreshed"),
                }
                Ok(())
            }
            Err(e) => {
                error!("Validation run failed: {e}");
                std::process::exit(1);
            }
        },
    }
}
