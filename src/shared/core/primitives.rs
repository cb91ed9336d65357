// Storage-agnostic primitives shared by the record store port and the calendar module.
//
// Purpose
// - Describe source records and their field metadata without tying them to a database.
// - Carry the polymorphic "model,id" reference used to point back at any source record.
//
// Boundaries
// - No input or output here. Adapters build these values, the core reads them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Numeric identifier of a stored record.
pub type RecordId = i64;

/// Technical name of the model that represents application users.
pub const USER_MODEL: &str = "res.users";

/// Format used for every timestamp the calendar writes.
pub const SERVER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const SERVER_DATE_FORMAT: &str = "%Y-%m-%d";

static NULL_VALUE: FieldValue = FieldValue::Null;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub model: String,
    pub id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Reference(EntityRef),
}

impl FieldValue {
    /// Unset values are null, `false`, empty text and zero numbers.
    pub fn is_set(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(value) => *value,
            FieldValue::Integer(value) => *value != 0,
            FieldValue::Float(value) => *value != 0.0,
            FieldValue::Text(value) => !value.is_empty(),
            FieldValue::Date(_) | FieldValue::DateTime(_) | FieldValue::Reference(_) => true,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Date(value) => write!(f, "{}", value.format(SERVER_DATE_FORMAT)),
            FieldValue::DateTime(value) => write!(f, "{}", value.format(SERVER_DATETIME_FORMAT)),
            FieldValue::Reference(reference) => write!(f, "{},{}", reference.model, reference.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Char,
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Datetime,
    Many2one { comodel: String },
}

impl FieldType {
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::Datetime)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldType,
}

/// Field metadata of a model, as exposed by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Registry identifier of the model itself.
    pub id: RecordId,
    /// Technical name, for example `crm.lead`.
    pub model: String,
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("record id '{0}' has no numeric prefix")]
pub struct InvalidRecordId(pub String);

/// Identifier as returned by the store: virtual occurrences of recurring
/// records carry a composite `"<id>-<suffix>"` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecordId {
    Numeric(RecordId),
    Composite(String),
}

impl RawRecordId {
    pub fn base_id(&self) -> Result<RecordId, InvalidRecordId> {
        match self {
            RawRecordId::Numeric(id) => Ok(*id),
            RawRecordId::Composite(raw) => raw
                .split('-')
                .next()
                .and_then(|prefix| prefix.trim().parse().ok())
                .ok_or_else(|| InvalidRecordId(raw.clone())),
        }
    }
}

impl fmt::Display for RawRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawRecordId::Numeric(id) => write!(f, "{id}"),
            RawRecordId::Composite(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: RawRecordId,
    #[serde(default)]
    pub values: BTreeMap<String, FieldValue>,
}

impl SourceRecord {
    pub fn new(id: RawRecordId) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    /// Missing fields read as `Null`.
    pub fn get(&self, field: &str) -> &FieldValue {
        self.values.get(field).unwrap_or(&NULL_VALUE)
    }
}

/// Polymorphic back-reference to a record of any model, written as `"model,id"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceRef {
    pub model: String,
    pub id: RecordId,
}

impl SourceRef {
    pub fn new(model: impl Into<String>, id: RecordId) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.model, self.id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a 'model,id' reference")]
pub struct InvalidSourceRef(pub String);

impl FromStr for SourceRef {
    type Err = InvalidSourceRef;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (model, id) = raw
            .rsplit_once(',')
            .ok_or_else(|| InvalidSourceRef(raw.to_string()))?;
        let id = id
            .trim()
            .parse()
            .map_err(|_| InvalidSourceRef(raw.to_string()))?;
        if model.is_empty() {
            return Err(InvalidSourceRef(raw.to_string()));
        }
        Ok(Self::new(model, id))
    }
}

impl TryFrom<String> for SourceRef {
    type Error = InvalidSourceRef;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<SourceRef> for String {
    fn from(reference: SourceRef) -> Self {
        reference.to_string()
    }
}
