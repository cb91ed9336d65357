// Description template: interpolation only.
//
// Syntax
// - Literal text with `${o.<field>}` placeholders, where `o` is the source record.
// - `${o.id}` renders the record identifier.
// - Optional filters after a pipe: `${o.name|upper}`. Known filters: upper, lower, trim, title.
//
// Boundaries
// - Placeholders are checked against the model once, when the template is compiled.
// - Rendering never fails and never evaluates code.

use crate::shared::core::primitives::{ModelDescriptor, SourceRecord};
use thiserror::Error;

/// Name the source record is bound to inside a template.
pub const RECORD_VARIABLE: &str = "o";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),

    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),

    #[error("unknown variable '{0}', only 'o' is bound")]
    UnknownVariable(String),

    #[error("unknown field '{field}' on model {model}")]
    UnknownField { field: String, model: String },

    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextFilter {
    Upper,
    Lower,
    Trim,
    Title,
}

impl TextFilter {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        match name {
            "upper" => Ok(TextFilter::Upper),
            "lower" => Ok(TextFilter::Lower),
            "trim" => Ok(TextFilter::Trim),
            "title" => Ok(TextFilter::Title),
            other => Err(TemplateError::UnknownFilter(other.to_string())),
        }
    }

    fn apply(self, text: String) -> String {
        match self {
            TextFilter::Upper => text.to_uppercase(),
            TextFilter::Lower => text.to_lowercase(),
            TextFilter::Trim => text.trim().to_string(),
            TextFilter::Title => text
                .split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    RecordId(Vec<TextFilter>),
    Field { name: String, filters: Vec<TextFilter> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionTemplate {
    segments: Vec<Segment>,
}

impl DescriptionTemplate {
    pub fn compile(source: &str, model: &ModelDescriptor) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("${") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let end = after_open
                .find('}')
                .ok_or(TemplateError::Unterminated(offset + start))?;
            segments.push(compile_placeholder(&after_open[..end], offset + start, model)?);

            let consumed = start + 2 + end + 1;
            rest = &rest[consumed..];
            offset += consumed;
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, record: &SourceRecord) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::RecordId(filters) => out.push_str(&apply_filters(record.id.to_string(), filters)),
                Segment::Field { name, filters } => {
                    out.push_str(&apply_filters(record.get(name).to_string(), filters))
                }
            }
        }
        out
    }
}

fn compile_placeholder(
    expression: &str,
    offset: usize,
    model: &ModelDescriptor,
) -> Result<Segment, TemplateError> {
    let mut parts = expression.split('|').map(str::trim);
    let path = parts.next().unwrap_or_default();
    if path.is_empty() {
        return Err(TemplateError::EmptyPlaceholder(offset));
    }
    let filters = parts.map(TextFilter::parse).collect::<Result<Vec<_>, _>>()?;

    let (variable, field) = path.split_once('.').unwrap_or((path, ""));
    if variable != RECORD_VARIABLE {
        return Err(TemplateError::UnknownVariable(variable.to_string()));
    }
    if field == "id" {
        return Ok(Segment::RecordId(filters));
    }
    if model.field(field).is_none() {
        return Err(TemplateError::UnknownField {
            field: field.to_string(),
            model: model.model.clone(),
        });
    }
    Ok(Segment::Field {
        name: field.to_string(),
        filters,
    })
}

fn apply_filters(text: String, filters: &[TextFilter]) -> String {
    filters.iter().fold(text, |text, filter| filter.apply(text))
}

#[cfg(test)]
mod description_template_tests {
    use super::*;
    use crate::shared::core::primitives::{FieldValue, RawRecordId};
    use crate::tests::fixtures::models::make_task_model;
    use rstest::{fixture, rstest};

    #[fixture]
    fn task() -> SourceRecord {
        SourceRecord::new(RawRecordId::Composite("14-20151110120000".into()))
            .with("name", FieldValue::Text("  plan the sprint ".into()))
            .with("stage", FieldValue::Text("open".into()))
            .with("planned_hours", FieldValue::Float(1.5))
    }

    #[rstest]
    #[case("${o.stage}: ${o.planned_hours}h", "open: 1.5h")]
    #[case("[${o.stage|upper}] ${o.name|trim|title}", "[OPEN] Plan The Sprint")]
    #[case("#${o.id}", "#14-20151110120000")]
    #[case("${ o.stage | lower }", "open")]
    #[case("No placeholders", "No placeholders")]
    #[case("Unset: '${o.partner_id}'", "Unset: ''")]
    fn it_should_render_the_template(task: SourceRecord, #[case] source: &str, #[case] expected: &str) {
        let template = DescriptionTemplate::compile(source, &make_task_model()).unwrap();
        assert_eq!(template.render(&task), expected);
    }

    #[rstest]
    #[case("Deadline ${o.stage", TemplateError::Unterminated(9))]
    #[case("${}", TemplateError::EmptyPlaceholder(0))]
    #[case("${self.stage}", TemplateError::UnknownVariable("self".into()))]
    #[case("${o.__class__}", TemplateError::UnknownField { field: "__class__".into(), model: "project.task".into() })]
    #[case("${o}", TemplateError::UnknownField { field: "".into(), model: "project.task".into() })]
    #[case("${o.stage|exec}", TemplateError::UnknownFilter("exec".into()))]
    fn it_should_reject_invalid_templates(#[case] source: &str, #[case] expected: TemplateError) {
        assert_eq!(
            DescriptionTemplate::compile(source, &make_task_model()),
            Err(expected)
        );
    }
}
