use crate::modules::super_calendar::use_cases::list_calendar_events::projection::CalendarEventView;
use crate::shared::core::primitives::RecordId;
use async_trait::async_trait;

#[async_trait]
pub trait CalendarEventQueries: Send + Sync {
    async fn list_by_user_id(
        &self,
        user_id: RecordId,
        offset: u64,
        limit: u64,
        sort_by_date_start_desc: bool,
    ) -> anyhow::Result<Vec<CalendarEventView>>;

    /// Every generated event, ordered by start date.
    async fn list_all(&self) -> anyhow::Result<Vec<CalendarEventView>>;
}
