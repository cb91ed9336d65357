// In memory store of generated calendar records.
//
// Purpose
// - Hold the generated set and serve the read side without a database.
//
// Responsibilities
// - Replace the whole set under a single write lock.
// - Answer listing queries from the current set.

use crate::modules::super_calendar::adapters::outbound::calendar_records::CalendarRecordRepository;
use crate::modules::super_calendar::core::calendar_record::CalendarRecord;
use crate::modules::super_calendar::use_cases::list_calendar_events::projection::CalendarEventView;
use crate::modules::super_calendar::use_cases::list_calendar_events::queries_port::CalendarEventQueries;
use crate::shared::core::primitives::RecordId;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryCalendarRecords {
    records: RwLock<Vec<CalendarRecord>>,
    is_offline: bool,
}

impl InMemoryCalendarRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait::async_trait]
impl CalendarRecordRepository for InMemoryCalendarRecords {
    async fn replace_all(&self, records: Vec<CalendarRecord>) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Calendar repository offline"));
        }

        *self.records.write().await = records;
        Ok(())
    }

    async fn all(&self) -> anyhow::Result<Vec<CalendarRecord>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Calendar repository offline"));
        }

        Ok(self.records.read().await.clone())
    }
}

#[async_trait::async_trait]
impl CalendarEventQueries for InMemoryCalendarRecords {
    async fn list_by_user_id(
        &self,
        user_id: RecordId,
        offset: u64,
        limit: u64,
        sort_by_date_start_desc: bool,
    ) -> anyhow::Result<Vec<CalendarEventView>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Calendar repository offline"));
        }

        let guard = self.records.read().await;

        let mut items: Vec<CalendarRecord> = guard
            .iter()
            .filter(|record| record.values.user_id == Some(user_id))
            .cloned()
            .collect();

        items.sort_by(|left, right| left.values.date_start.cmp(&right.values.date_start));
        if sort_by_date_start_desc {
            items.reverse();
        }

        let start = offset as usize;
        let end = start.saturating_add(limit as usize).min(items.len());
        if start >= items.len() {
            return Ok(Vec::new());
        }
        Ok(items[start..end]
            .iter()
            .cloned()
            .map(CalendarEventView::from)
            .collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<CalendarEventView>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Calendar repository offline"));
        }

        let mut items = self.records.read().await.clone();
        items.sort_by(|left, right| left.values.date_start.cmp(&right.values.date_start));
        Ok(items.into_iter().map(CalendarEventView::from).collect())
    }
}

#[cfg(test)]
mod in_memory_calendar_records_tests {
    use super::*;
    use crate::modules::super_calendar::core::calendar_record::CalendarEventValues;
    use crate::shared::core::primitives::SourceRef;
    use rstest::{fixture, rstest};

    fn make_record(source_id: RecordId, user_id: Option<RecordId>, date_start: &str) -> CalendarRecord {
        CalendarRecord::create(CalendarEventValues {
            name: format!("Task {source_id}"),
            date_start: date_start.into(),
            duration: None,
            user_id,
            configurator_id: 1,
            res_id: SourceRef::new("project.task", source_id),
            model_id: 30,
        })
    }

    #[fixture]
    fn before_each() -> Vec<CalendarRecord> {
        vec![
            make_record(1, Some(5), "2024-01-02 09:00:00"),
            make_record(2, Some(5), "2024-01-01 09:00:00"),
            make_record(3, Some(6), "2024-01-03 09:00:00"),
            make_record(4, None, "2023-12-31 09:00:00"),
            make_record(5, Some(5), "2024-01-03 09:00:00"),
        ]
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_replace_the_whole_set(before_each: Vec<CalendarRecord>) {
        let repository = InMemoryCalendarRecords::new();
        repository.replace_all(before_each.clone()).await.unwrap();
        repository
            .replace_all(vec![before_each[0].clone()])
            .await
            .unwrap();
        assert_eq!(repository.all().await.unwrap(), vec![before_each[0].clone()]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_a_users_events_by_start_date(before_each: Vec<CalendarRecord>) {
        let repository = InMemoryCalendarRecords::new();
        repository.replace_all(before_each).await.unwrap();

        let ascending = repository.list_by_user_id(5, 0, 10, false).await.unwrap();
        let sources: Vec<_> = ascending.iter().map(|view| view.res_id.as_str()).collect();
        assert_eq!(sources, vec!["project.task,2", "project.task,1", "project.task,5"]);

        let page = repository.list_by_user_id(5, 1, 1, true).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].res_id, "project.task,1");

        assert!(repository.list_by_user_id(5, 3, 10, false).await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_every_event(before_each: Vec<CalendarRecord>) {
        let repository = InMemoryCalendarRecords::new();
        repository.replace_all(before_each).await.unwrap();
        let all = repository.list_all().await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].res_id, "project.task,4");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_if_the_repository_is_offline(before_each: Vec<CalendarRecord>) {
        let mut repository = InMemoryCalendarRecords::new();
        repository.toggle_offline();
        let result = repository.replace_all(before_each).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Calendar repository offline")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_list_if_the_repository_is_offline(before_each: Vec<CalendarRecord>) {
        let mut repository = InMemoryCalendarRecords::new();
        repository.replace_all(before_each).await.unwrap();
        repository.toggle_offline();

        let by_user = repository.list_by_user_id(5, 0, 10, false).await;
        assert!(by_user.is_err());
        assert!(by_user.unwrap_err().to_string().contains("Calendar repository offline"));

        let all = repository.list_all().await;
        assert!(all.is_err());
        assert!(all.unwrap_err().to_string().contains("Calendar repository offline"));
    }
}
