use crate::modules::super_calendar::core::calendar_record::CalendarRecord;
use crate::shared::core::primitives::RecordId;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalendarEventView {
    pub id: Uuid,
    pub name: String,
    pub date_start: String,
    pub duration: Option<f64>,
    pub user_id: Option<RecordId>,
    pub configurator_id: RecordId,
    /// `"model,id"` of the source record.
    pub res_id: String,
    pub model_id: RecordId,
}

impl From<CalendarRecord> for CalendarEventView {
    fn from(record: CalendarRecord) -> Self {
        let values = record.values;
        Self {
            id: record.id,
            name: values.name,
            date_start: values.date_start,
            duration: values.duration,
            user_id: values.user_id,
            configurator_id: values.configurator_id,
            res_id: values.res_id.to_string(),
            model_id: values.model_id,
        }
    }
}

#[cfg(test)]
mod calendar_event_view_tests {
    use super::*;
    use crate::modules::super_calendar::core::calendar_record::CalendarEventValues;
    use crate::shared::core::primitives::SourceRef;
    use rstest::rstest;

    #[rstest]
    fn it_should_create_the_view() {
        let record = CalendarRecord::create(CalendarEventValues {
            name: "Weekly sync".into(),
            date_start: "2015-11-10 12:00:00".into(),
            duration: Some(0.75),
            user_id: Some(7),
            configurator_id: 2,
            res_id: SourceRef::new("calendar.event", 14),
            model_id: 41,
        });
        let view = CalendarEventView::from(record.clone());
        assert_eq!(view.id, record.id);
        assert_eq!(view.res_id, "calendar.event,14");
        assert_eq!(view.duration, Some(0.75));
    }
}
