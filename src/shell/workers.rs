// Background workers.
//
// Purpose
// - Regenerate the calendar on a fixed interval until shutdown.
//
// Behaviour
// - The first tick fires immediately. Missed ticks are skipped, never queued.
// - Failures are logged and the next tick tries again. An overlapping run is only logged at debug level.

use crate::modules::super_calendar::adapters::outbound::calendar_records::CalendarRecordRepository;
use crate::modules::super_calendar::adapters::outbound::configurators::ConfiguratorRepository;
use crate::modules::super_calendar::use_cases::regenerate_calendar::handler::{
    ApplicationError, RegenerateCalendarHandler,
};
use crate::shared::infrastructure::record_store::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Run one regeneration and log its outcome. `true` when the new set was swapped in.
pub async fn run_once<TRecordStore, TConfigurators, TCalendar>(
    handler: &RegenerateCalendarHandler<TRecordStore, TConfigurators, TCalendar>,
) -> bool
where
    TRecordStore: RecordStore + 'static,
    TConfigurators: ConfiguratorRepository + 'static,
    TCalendar: CalendarRecordRepository + 'static,
{
    match handler.regenerate().await {
        Ok(report) => {
            for warning in &report.warnings {
                warn!(%warning, "calendar projection warning");
            }
            true
        }
        Err(ApplicationError::AlreadyRunning) => {
            debug!("calendar regeneration skipped, previous run still active");
            false
        }
        Err(err) => {
            error!(error = %err, "calendar regeneration failed");
            false
        }
    }
}

pub fn spawn_regeneration_worker<TRecordStore, TConfigurators, TCalendar>(
    handler: Arc<RegenerateCalendarHandler<TRecordStore, TConfigurators, TCalendar>>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    TRecordStore: RecordStore + 'static,
    TConfigurators: ConfiguratorRepository + 'static,
    TCalendar: CalendarRecordRepository + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(every_secs = every.as_secs_f64(), "calendar regeneration worker started");

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    run_once(handler.as_ref()).await;
                }
            }
        }
        info!("calendar regeneration worker stopped");
    })
}
