// Date and duration arithmetic for calendar events.
//
// Responsibilities
// - Read a temporal field value as a naive timestamp (dates read as midnight).
// - Compute fractional hours between two timestamps.
// - Move a local midnight to UTC in a given timezone.
// - Format timestamps in the fixed server format.

use crate::shared::core::primitives::{FieldValue, SERVER_DATE_FORMAT, SERVER_DATETIME_FORMAT};
use chrono::{LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Second precision. `None` for values that hold no date.
pub fn naive_timestamp(value: &FieldValue) -> Option<NaiveDateTime> {
    let timestamp = match value {
        FieldValue::Date(date) => date.and_hms_opt(0, 0, 0),
        FieldValue::DateTime(datetime) => Some(*datetime),
        FieldValue::Text(raw) => NaiveDateTime::parse_from_str(raw.trim(), SERVER_DATETIME_FORMAT)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw.trim(), SERVER_DATE_FORMAT)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            }),
        _ => None,
    }?;
    timestamp.with_nanosecond(0)
}

pub fn duration_hours(start: NaiveDateTime, stop: NaiveDateTime) -> f64 {
    (stop - start).num_seconds() as f64 / SECONDS_PER_HOUR
}

/// Ambiguous local times take the earlier instant. Local times skipped by a
/// transition are read with the offset in force before it.
pub fn local_to_utc(local: NaiveDateTime, timezone: Tz) -> NaiveDateTime {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(datetime) => datetime.naive_utc(),
        LocalResult::Ambiguous(earliest, _) => earliest.naive_utc(),
        LocalResult::None => {
            // A day earlier is safely before the gap.
            let before_gap = local - TimeDelta::days(1);
            let offset = timezone.offset_from_utc_datetime(&before_gap).fix();
            local - TimeDelta::seconds(i64::from(offset.local_minus_utc()))
        }
    }
}

pub fn format_server_datetime(timestamp: NaiveDateTime) -> String {
    timestamp.format(SERVER_DATETIME_FORMAT).to_string()
}
