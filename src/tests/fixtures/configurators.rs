// Builders for configurators and mapping lines.

use crate::modules::super_calendar::core::configurator::{
    Configurator, DescriptionType, MappingLine,
};
use crate::shared::core::primitives::RecordId;

/// Defaults to a `project.task` line: name as description, `date_start`/`date_end` window, owner in `user_id`.
pub struct MappingLineBuilder {
    line: MappingLine,
}

impl MappingLineBuilder {
    pub fn new() -> Self {
        Self {
            line: MappingLine {
                id: 10,
                model: "project.task".into(),
                domain: None,
                user_field: Some("user_id".into()),
                description_field: Some("name".into()),
                description_type: DescriptionType::Field,
                description_code: None,
                date_start_field: "date_start".into(),
                date_stop_field: Some("date_end".into()),
                duration_field: None,
            },
        }
    }

    pub fn id(mut self, id: RecordId) -> Self {
        self.line.id = id;
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.line.model = model.into();
        self
    }

    pub fn domain(mut self, domain: &str) -> Self {
        self.line.domain = Some(domain.into());
        self
    }

    pub fn user_field(mut self, field: Option<&str>) -> Self {
        self.line.user_field = field.map(Into::into);
        self
    }

    pub fn description_field(mut self, field: Option<&str>) -> Self {
        self.line.description_field = field.map(Into::into);
        self
    }

    pub fn description_code(mut self, code: &str) -> Self {
        self.line.description_type = DescriptionType::Code;
        self.line.description_code = Some(code.into());
        self
    }

    pub fn date_start_field(mut self, field: &str) -> Self {
        self.line.date_start_field = field.into();
        self
    }

    pub fn date_stop_field(mut self, field: Option<&str>) -> Self {
        self.line.date_stop_field = field.map(Into::into);
        self
    }

    pub fn duration_field(mut self, field: Option<&str>) -> Self {
        self.line.duration_field = field.map(Into::into);
        self
    }

    pub fn build(self) -> MappingLine {
        self.line
    }
}

pub fn make_configurator(id: RecordId, lines: Vec<MappingLine>) -> Configurator {
    Configurator {
        id,
        name: format!("Configurator {id}"),
        lines,
    }
}
