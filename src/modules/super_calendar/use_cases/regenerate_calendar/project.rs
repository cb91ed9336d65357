// Per-line projector: mapping line + source records -> calendar event values.
//
// Purpose
// - Resolve a mapping line once against its model (fields, filter, template).
// - Turn every qualifying source record into one set of calendar event values.
//
// Rules, in order
// - Records without a description (or template) or without a start date are skipped.
// - A populated owner field must reference a user, otherwise the run is rejected.
// - Duration comes from the start/stop pair when no duration field is configured,
//   from the duration field otherwise. A negative start/stop duration is reported
//   as a warning and left unset.
// - Date-only starts are read as local midnight in the acting timezone and stored in UTC.
// - Composite ids of recurring occurrences point back to their base record.

use crate::modules::super_calendar::core::calendar_record::CalendarEventValues;
use crate::modules::super_calendar::core::configurator::{DescriptionType, MappingLine};
use crate::modules::super_calendar::core::description_template::{
    DescriptionTemplate, TemplateError,
};
use crate::modules::super_calendar::core::event_time::{
    duration_hours, format_server_datetime, local_to_utc, naive_timestamp,
};
use crate::shared::core::domain_filter::{DomainFilter, FilterError};
use crate::shared::core::primitives::{
    FieldType, FieldValue, ModelDescriptor, RawRecordId, RecordId, SourceRecord, SourceRef,
    USER_MODEL,
};
use crate::shared::infrastructure::record_store::{RecordStore, StoreError};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("configuration error on line {line_id} ({model}): {reason}")]
    Configuration {
        line_id: RecordId,
        model: String,
        reason: String,
    },

    #[error("invalid filter on line {line_id}: {source}")]
    Filter {
        line_id: RecordId,
        #[source]
        source: FilterError,
    },

    #[error("invalid description template on line {line_id}: {source}")]
    Template {
        line_id: RecordId,
        #[source]
        source: TemplateError,
    },

    #[error("The 'User' field of record {description} ({model}) does not refer to res.users")]
    Validation { description: String, model: String },

    #[error("record {record} of {model} has an invalid value in field '{field}'")]
    InvalidValue {
        record: String,
        model: String,
        field: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionWarning {
    NegativeDuration { res_id: SourceRef, hours: f64 },
}

impl fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionWarning::NegativeDuration { res_id, hours } => write!(
                f,
                "{res_id} stops {:.2}h before it starts, duration left unset",
                hours.abs()
            ),
        }
    }
}

/// Values for one qualifying source record, traceable to that record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedEvent {
    pub source_id: RawRecordId,
    pub values: CalendarEventValues,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineProjection {
    pub events: Vec<ProjectedEvent>,
    pub skipped: usize,
    pub warnings: Vec<ProjectionWarning>,
}

#[derive(Debug, Clone)]
struct FieldAccessor {
    name: String,
    field_type: FieldType,
}

impl FieldAccessor {
    fn read<'r>(&self, record: &'r SourceRecord) -> &'r FieldValue {
        record.get(&self.name)
    }
}

#[derive(Debug, Clone)]
enum NameSource {
    Field(FieldAccessor),
    Template(DescriptionTemplate),
}

/// A mapping line resolved against its model.
#[derive(Debug, Clone)]
pub struct LineProjector {
    line_id: RecordId,
    configurator_id: RecordId,
    model: ModelDescriptor,
    filter: DomainFilter,
    user: Option<FieldAccessor>,
    name: NameSource,
    date_start: FieldAccessor,
    date_stop: Option<FieldAccessor>,
    duration: Option<FieldAccessor>,
    timezone: Tz,
}

impl LineProjector {
    pub fn resolve(
        configurator_id: RecordId,
        line: &MappingLine,
        model: ModelDescriptor,
        timezone: Tz,
    ) -> Result<Self, ProjectionError> {
        let resolver = AccessorResolver {
            line_id: line.id,
            model: &model,
        };

        let user = line
            .user_field
            .as_deref()
            .map(|name| resolver.resolve(name, "user", |_| true, ""))
            .transpose()?;
        let date_start = resolver.resolve(
            &line.date_start_field,
            "start date",
            FieldType::is_temporal,
            "a date or datetime",
        )?;
        let date_stop = line
            .date_stop_field
            .as_deref()
            .map(|name| {
                resolver.resolve(name, "stop date", FieldType::is_temporal, "a date or datetime")
            })
            .transpose()?;
        let duration = line
            .duration_field
            .as_deref()
            .map(|name| resolver.resolve(name, "duration", FieldType::is_numeric, "numeric"))
            .transpose()?;

        let name = match line.description_type {
            DescriptionType::Field => {
                let field = line.description_field.as_deref().ok_or_else(|| {
                    resolver.configuration("no description field is configured".into())
                })?;
                NameSource::Field(resolver.resolve(field, "description", |_| true, "")?)
            }
            DescriptionType::Code => {
                let code = line
                    .description_code
                    .as_deref()
                    .filter(|code| !code.trim().is_empty())
                    .ok_or_else(|| {
                        resolver.configuration("no description template is configured".into())
                    })?;
                let template = DescriptionTemplate::compile(code, &model).map_err(|source| {
                    ProjectionError::Template {
                        line_id: line.id,
                        source,
                    }
                })?;
                NameSource::Template(template)
            }
        };

        let filter = DomainFilter::parse(line.domain.as_deref().unwrap_or_default())
            .and_then(|filter| filter.validate(&model).map(|()| filter))
            .map_err(|source| ProjectionError::Filter {
                line_id: line.id,
                source,
            })?;

        Ok(Self {
            line_id: line.id,
            configurator_id,
            model,
            filter,
            user,
            name,
            date_start,
            date_stop,
            duration,
            timezone,
        })
    }

    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }

    pub fn project(&self, records: &[SourceRecord]) -> Result<LineProjection, ProjectionError> {
        let mut projection = LineProjection::default();
        for record in records {
            match self.project_record(record)? {
                None => projection.skipped += 1,
                Some((event, warning)) => {
                    projection.events.push(event);
                    projection.warnings.extend(warning);
                }
            }
        }
        tracing::debug!(
            line_id = self.line_id,
            model = %self.model.model,
            events = projection.events.len(),
            skipped = projection.skipped,
            "mapping line projected"
        );
        Ok(projection)
    }

    fn project_record(
        &self,
        record: &SourceRecord,
    ) -> Result<Option<(ProjectedEvent, Option<ProjectionWarning>)>, ProjectionError> {
        let has_description = match &self.name {
            NameSource::Field(description) => description.read(record).is_set(),
            NameSource::Template(_) => true,
        };
        let start_value = self.date_start.read(record);
        if !has_description || !start_value.is_set() {
            return Ok(None);
        }

        let name = match &self.name {
            NameSource::Field(description) => description.read(record).to_string(),
            NameSource::Template(template) => template.render(record),
        };
        let user_id = self.owner(record, &name)?;

        let id = record
            .id
            .base_id()
            .map_err(|_| self.invalid_value(record, "id"))?;
        let res_id = SourceRef::new(self.model.model.clone(), id);

        let start = self.timestamp(record, &self.date_start)?;
        let (duration, warning) = self.duration(record, start, &res_id)?;

        let date_start = match self.date_start.field_type {
            FieldType::Date => local_to_utc(start, self.timezone),
            _ => start,
        };

        let event = ProjectedEvent {
            source_id: record.id.clone(),
            values: CalendarEventValues {
                name,
                date_start: format_server_datetime(date_start),
                duration,
                user_id,
                configurator_id: self.configurator_id,
                res_id,
                model_id: self.model.id,
            },
        };
        Ok(Some((event, warning)))
    }

    fn owner(
        &self,
        record: &SourceRecord,
        description: &str,
    ) -> Result<Option<RecordId>, ProjectionError> {
        let Some(user) = &self.user else {
            return Ok(None);
        };
        match user.read(record) {
            FieldValue::Reference(reference) if reference.model == USER_MODEL => {
                Ok(Some(reference.id))
            }
            value if !value.is_set() => Ok(None),
            _ => Err(ProjectionError::Validation {
                description: description.to_string(),
                model: self.model.model.clone(),
            }),
        }
    }

    /// The duration field is passed through as stored. Only a stop before the start is rejected.
    fn duration(
        &self,
        record: &SourceRecord,
        start: NaiveDateTime,
        res_id: &SourceRef,
    ) -> Result<(Option<f64>, Option<ProjectionWarning>), ProjectionError> {
        match (&self.duration, &self.date_stop) {
            (None, Some(stop)) if stop.read(record).is_set() => {
                let stop = self.timestamp(record, stop)?;
                let hours = duration_hours(start, stop);
                if hours < 0.0 {
                    tracing::warn!(
                        res_id = %res_id,
                        hours,
                        "stop date precedes start date, leaving duration unset"
                    );
                    let warning = ProjectionWarning::NegativeDuration {
                        res_id: res_id.clone(),
                        hours,
                    };
                    return Ok((None, Some(warning)));
                }
                Ok((Some(hours), None))
            }
            (Some(duration), _) => Ok((duration.read(record).as_f64(), None)),
            _ => Ok((None, None)),
        }
    }

    fn timestamp(
        &self,
        record: &SourceRecord,
        field: &FieldAccessor,
    ) -> Result<NaiveDateTime, ProjectionError> {
        naive_timestamp(field.read(record)).ok_or_else(|| self.invalid_value(record, &field.name))
    }

    fn invalid_value(&self, record: &SourceRecord, field: &str) -> ProjectionError {
        ProjectionError::InvalidValue {
            record: record.id.to_string(),
            model: self.model.model.clone(),
            field: field.to_string(),
        }
    }
}

struct AccessorResolver<'a> {
    line_id: RecordId,
    model: &'a ModelDescriptor,
}

impl AccessorResolver<'_> {
    fn resolve(
        &self,
        name: &str,
        role: &str,
        accepts: impl Fn(&FieldType) -> bool,
        expected: &str,
    ) -> Result<FieldAccessor, ProjectionError> {
        let field = self.model.field(name).ok_or_else(|| {
            self.configuration(format!("{role} field '{name}' does not exist"))
        })?;
        if !accepts(&field.field_type) {
            return Err(self.configuration(format!("{role} field '{name}' must be {expected}")));
        }
        Ok(FieldAccessor {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
        })
    }

    fn configuration(&self, reason: String) -> ProjectionError {
        ProjectionError::Configuration {
            line_id: self.line_id,
            model: self.model.model.clone(),
            reason,
        }
    }
}

/// Resolve `line` against the store and project every record its filter matches.
pub async fn project_line<TRecordStore>(
    store: &TRecordStore,
    configurator_id: RecordId,
    line: &MappingLine,
    timezone: Tz,
) -> Result<LineProjection, ProjectionError>
where
    TRecordStore: RecordStore + ?Sized,
{
    let model = store.model(&line.model).await?;
    let projector = LineProjector::resolve(configurator_id, line, model, timezone)?;
    let records = store.search(&line.model, projector.filter()).await?;
    projector.project(&records)
}
