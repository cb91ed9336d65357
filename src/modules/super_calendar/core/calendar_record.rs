// Generated calendar record.
//
// Purpose
// - The uniform event shape every mapping line projects into.
//
// Lifecycle
// - Only created by a regeneration run. The whole set is replaced on every run,
//   so the id carries no meaning across runs.

use crate::shared::core::primitives::{RecordId, SourceRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Values computed for one source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventValues {
    pub name: String,
    /// UTC, formatted as `YYYY-MM-DD HH:MM:SS`.
    pub date_start: String,
    /// Hours. `None` when no duration could be derived.
    pub duration: Option<f64>,
    pub user_id: Option<RecordId>,
    pub configurator_id: RecordId,
    pub res_id: SourceRef,
    /// Registry identifier of the source model.
    pub model_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub values: CalendarEventValues,
}

impl CalendarRecord {
    pub fn create(values: CalendarEventValues) -> Self {
        Self {
            id: Uuid::now_v7(),
            values,
        }
    }
}
