use crate::modules::super_calendar::adapters::outbound::calendar_records::CalendarRecordRepository;
use crate::modules::super_calendar::adapters::outbound::configurators::ConfiguratorRepository;
use crate::modules::super_calendar::core::calendar_record::CalendarRecord;
use crate::modules::super_calendar::use_cases::regenerate_calendar::project::{
    ProjectionError, ProjectionWarning, project_line,
};
use crate::shared::infrastructure::record_store::RecordStore;
use crate::shared::infrastructure::user_context::{UserContextProvider, resolve_timezone};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("a calendar regeneration is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegenerationReport {
    pub configurators: usize,
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
    pub warnings: Vec<ProjectionWarning>,
}

pub struct RegenerateCalendarHandler<TRecordStore, TConfigurators, TCalendar>
where
    TRecordStore: RecordStore + 'static,
    TConfigurators: ConfiguratorRepository + 'static,
    TCalendar: CalendarRecordRepository + 'static,
{
    record_store: Arc<TRecordStore>,
    configurators: Arc<TConfigurators>,
    calendar: Arc<TCalendar>,
    user_context: Arc<dyn UserContextProvider>,
    run_lock: Mutex<()>,
}

impl<TRecordStore, TConfigurators, TCalendar>
    RegenerateCalendarHandler<TRecordStore, TConfigurators, TCalendar>
where
    TRecordStore: RecordStore + 'static,
    TConfigurators: ConfiguratorRepository + 'static,
    TCalendar: CalendarRecordRepository + 'static,
{
    pub fn new(
        record_store: Arc<TRecordStore>,
        configurators: Arc<TConfigurators>,
        calendar: Arc<TCalendar>,
        user_context: Arc<dyn UserContextProvider>,
    ) -> Self {
        Self {
            record_store,
            configurators,
            calendar,
            user_context,
            run_lock: Mutex::new(()),
        }
    }

    /// Rebuild the generated set from every configurator and swap it in.
    /// Nothing is written unless every line projects cleanly.
    #[instrument(skip(self))]
    pub async fn regenerate(&self) -> Result<RegenerationReport, ApplicationError> {
        let _running = self
            .run_lock
            .try_lock()
            .map_err(|_| ApplicationError::AlreadyRunning)?;

        let timezone = resolve_timezone(self.user_context.as_ref());
        let configurators = self.configurators.list().await?;

        let mut report = RegenerationReport {
            configurators: configurators.len(),
            ..RegenerationReport::default()
        };
        let mut records = Vec::new();
        for configurator in &configurators {
            for line in &configurator.lines {
                let projection =
                    project_line(self.record_store.as_ref(), configurator.id, line, timezone)
                        .await?;
                report.lines += 1;
                report.skipped += projection.skipped;
                report.warnings.extend(projection.warnings);
                records.extend(
                    projection
                        .events
                        .into_iter()
                        .map(|event| CalendarRecord::create(event.values)),
                );
            }
        }
        report.records = records.len();

        self.calendar.replace_all(records).await?;
        info!(
            configurators = report.configurators,
            lines = report.lines,
            records = report.records,
            skipped = report.skipped,
            warnings = report.warnings.len(),
            "Calendar generated"
        );
        Ok(report)
    }
}
