use anyhow::Context;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use super_calendar::modules::super_calendar::adapters::outbound::calendar_records_in_memory::InMemoryCalendarRecords;
use super_calendar::modules::super_calendar::adapters::outbound::configurators_in_memory::InMemoryConfigurators;
use super_calendar::modules::super_calendar::use_cases::list_calendar_events::queries_port::CalendarEventQueries;
use super_calendar::modules::super_calendar::use_cases::regenerate_calendar::handler::RegenerateCalendarHandler;
use super_calendar::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use super_calendar::shared::infrastructure::user_context::StaticUserContext;
use super_calendar::shell::config::AppConfig;
use super_calendar::shell::seed::{Seed, load_seed};
use super_calendar::shell::workers::spawn_regeneration_worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env().context("reading configuration")?;
    let seed = match &config.seed_path {
        Some(path) => load_seed(path)?,
        None => Seed::default(),
    };
    tracing::info!(
        models = seed.models.len(),
        configurators = seed.configurators.len(),
        "seed loaded"
    );

    // In-memory deps for now
    let record_store = Arc::new(InMemoryRecordStore::from_tables(seed.models));
    let configurators = Arc::new(InMemoryConfigurators::from(seed.configurators));
    let calendar = Arc::new(InMemoryCalendarRecords::new());
    let user_context = Arc::new(StaticUserContext::new(
        config.user_timezone.clone(),
        config.default_timezone.clone(),
    ));

    let handler = Arc::new(RegenerateCalendarHandler::new(
        record_store,
        configurators,
        calendar.clone(),
        user_context,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = spawn_regeneration_worker(handler, config.regenerate_interval, shutdown_rx);

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutting down");
    shutdown_tx.send(true).context("signalling the worker")?;
    worker.await.context("joining the worker")?;

    let events = calendar.list_all().await?;
    tracing::info!(events = events.len(), "last generated calendar");
    Ok(())
}
