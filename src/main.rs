//! capacity-sync batch entry point.
//!
//! One-shot run: lists events from the CRM, updates every content record,
//! logs progress along the way, and exits. Scheduling is left to cron or
//! the container orchestrator.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use capacity_sync::clock::SystemClock;
use capacity_sync::config::SyncConfig;
use capacity_sync::persistence::{PgContentStore, PgEventSource, PgOutboxNotifier};
use capacity_sync::service::CapacityUpdater;

/// Progress is logged once per this many processed events.
const PROGRESS_LOG_EVERY: usize = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = SyncConfig::from_env();

    // Tag every log line of this run
    let run_id = Uuid::new_v4();
    run(config)
        .instrument(tracing::info_span!("sync_run", run_id = %run_id))
        .await
}

async fn run(config: SyncConfig) -> anyhow::Result<()> {
    tracing::info!("starting capacity sync");

    // Connect to PostgreSQL and apply pending migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    // Build the updater over the PostgreSQL adapters
    let updater = CapacityUpdater::new(
        Arc::new(PgEventSource::new(pool.clone())),
        Arc::new(PgContentStore::new(pool.clone())),
        Arc::new(PgOutboxNotifier::new(pool)),
        Arc::new(SystemClock),
        config.marketing,
        &config.site_base_url,
    );

    // Run the batch
    let ids = updater.event_ids().await;
    if ids.is_empty() {
        tracing::info!("no events to update");
        return Ok(());
    }
    tracing::info!(total = ids.len(), "updating events");

    let mut last_logged = 0;
    let processed = updater
        .update_events_with_progress(&ids, |processed, total| {
            if processed - last_logged >= PROGRESS_LOG_EVERY || processed == total {
                tracing::info!(processed, total, "progress");
                last_logged = processed;
            }
        })
        .await;

    tracing::info!(processed, "capacity sync complete");
    Ok(())
}
