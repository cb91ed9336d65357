use crate::modules::super_calendar::core::calendar_record::CalendarRecord;
use async_trait::async_trait;

#[async_trait]
pub trait CalendarRecordRepository: Send + Sync {
    /// Swap the whole generated set in one step. Readers see the old set or the new one.
    async fn replace_all(&self, records: Vec<CalendarRecord>) -> anyhow::Result<()>;

    async fn all(&self) -> anyhow::Result<Vec<CalendarRecord>>;
}
