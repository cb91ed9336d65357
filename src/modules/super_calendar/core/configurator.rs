// Configurator and its mapping lines.
//
// Purpose
// - Describe, per source model, which fields feed the name, start, duration and owner of a calendar event.
//
// Ownership
// - A configurator owns its lines. Removing a configurator removes its lines with it.
// - Lines keep their declared order.

use crate::shared::core::primitives::RecordId;
use serde::{Deserialize, Serialize};

/// How the display name of an event is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionType {
    /// Copy the description field verbatim.
    #[default]
    Field,
    /// Render `description_code` against the source record.
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingLine {
    pub id: RecordId,
    /// Technical name of the model to scan.
    pub model: String,
    /// Serialized filter, see `shared::core::domain_filter`. Empty matches every record.
    pub domain: Option<String>,
    pub user_field: Option<String>,
    pub description_field: Option<String>,
    #[serde(default)]
    pub description_type: DescriptionType,
    pub description_code: Option<String>,
    pub date_start_field: String,
    pub date_stop_field: Option<String>,
    pub duration_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configurator {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub lines: Vec<MappingLine>,
}
