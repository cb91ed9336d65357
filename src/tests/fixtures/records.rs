// Source records shared by the tests.

use crate::shared::core::primitives::{
    EntityRef, FieldValue, RawRecordId, RecordId, SERVER_DATETIME_FORMAT, SourceRecord, USER_MODEL,
};
use chrono::{NaiveDate, NaiveDateTime};

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, SERVER_DATETIME_FORMAT).unwrap()
}

pub fn user(id: RecordId) -> FieldValue {
    FieldValue::Reference(EntityRef {
        model: USER_MODEL.into(),
        id,
    })
}

/// Task owned by user 5, from 10:00 to 12:30 on 2024-01-01, due 2024-03-01, planned 4h.
pub fn make_task(id: RecordId, name: &str, stage: &str) -> SourceRecord {
    SourceRecord::new(RawRecordId::Numeric(id))
        .with("name", FieldValue::Text(name.into()))
        .with("stage", FieldValue::Text(stage.into()))
        .with("user_id", user(5))
        .with("date_start", FieldValue::DateTime(at("2024-01-01 10:00:00")))
        .with("date_end", FieldValue::DateTime(at("2024-01-01 12:30:00")))
        .with(
            "date_deadline",
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        )
        .with("planned_hours", FieldValue::Float(4.0))
}

/// Occurrence of a recurring meeting, identified by `"<id>-<suffix>"`.
pub fn make_meeting_occurrence(id: &str, name: &str, start: &str, stop: &str) -> SourceRecord {
    SourceRecord::new(RawRecordId::Composite(id.into()))
        .with("name", FieldValue::Text(name.into()))
        .with("user_id", user(7))
        .with("start", FieldValue::DateTime(at(start)))
        .with("stop", FieldValue::DateTime(at(stop)))
}
