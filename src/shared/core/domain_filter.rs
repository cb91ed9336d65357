// Typed record filter ("domain") understood by the record store.
//
// Purpose
// - Parse the serialized filter of a mapping line into a whitelisted predicate tree.
// - Evaluate that tree against a source record without executing any host code.
//
// Syntax
// - A JSON array in prefix notation: `[["state", "=", "open"], "|", ["priority", ">", 1], ["user_id", "=", false]]`.
// - `"&"` and `"|"` take the next two expressions, `"!"` the next one.
// - Consecutive top-level expressions are joined with AND. An empty filter matches everything.
//
// Failure mode
// - Anything outside the grammar is rejected with a FilterError. There is no fallback to match-all.

use crate::shared::core::primitives::{
    FieldValue, ModelDescriptor, SERVER_DATE_FORMAT, SERVER_DATETIME_FORMAT, SourceRecord,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value as Json;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pseudo-field that matches the numeric base id of a record.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("malformed filter: {0}")]
    Malformed(String),

    #[error("invalid filter term: {0}")]
    InvalidTerm(String),

    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("operator '{0}' is missing an operand")]
    MissingOperand(String),

    #[error("invalid operand for '{operator}' on field '{field}'")]
    InvalidOperand { field: String, operator: String },

    #[error("unknown field '{field}' on model {model}")]
    UnknownField { field: String, model: String },

    #[error("cannot compare field '{field}' with {literal}")]
    Incomparable { field: String, literal: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Like,
    NotLike,
    ILike,
    NotILike,
}

impl Operator {
    fn expects_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::NotEq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "in" => Ok(Operator::In),
            "not in" => Ok(Operator::NotIn),
            "like" => Ok(Operator::Like),
            "not like" => Ok(Operator::NotLike),
            "ilike" => Ok(Operator::ILike),
            "not ilike" => Ok(Operator::NotILike),
            other => Err(FilterError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::ILike => "ilike",
            Operator::NotILike => "not ilike",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Literal>),
}

impl Literal {
    fn from_json(value: Json) -> Option<Self> {
        match value {
            Json::Null => Some(Literal::Null),
            Json::Bool(flag) => Some(Literal::Bool(flag)),
            Json::Number(number) => number
                .as_i64()
                .map(Literal::Integer)
                .or_else(|| number.as_f64().map(Literal::Float)),
            Json::String(text) => Some(Literal::Text(text)),
            Json::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Json::Array(_) | Json::Object(_) => None,
                    scalar => Literal::from_json(scalar),
                })
                .collect::<Option<Vec<_>>>()
                .map(Literal::List),
            Json::Object(_) => None,
        }
    }

    fn is_unset_marker(&self) -> bool {
        matches!(self, Literal::Null | Literal::Bool(false))
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Integer(value) => Some(*value as f64),
            Literal::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(flag) => write!(f, "{flag}"),
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::Float(value) => write!(f, "{value}"),
            Literal::Text(text) => write!(f, "'{text}'"),
            Literal::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Condition {
        field: String,
        operator: Operator,
        value: Literal,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    fn collect_fields<'a>(&'a self, into: &mut Vec<&'a str>) {
        match self {
            Predicate::Condition { field, .. } => into.push(field),
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_fields(into);
                right.collect_fields(into);
            }
            Predicate::Not(inner) => inner.collect_fields(into),
        }
    }

    fn evaluate(&self, record: &SourceRecord) -> Result<bool, FilterError> {
        match self {
            Predicate::Condition {
                field,
                operator,
                value,
            } => evaluate_condition(record, field, *operator, value),
            Predicate::And(left, right) => Ok(left.evaluate(record)? && right.evaluate(record)?),
            Predicate::Or(left, right) => Ok(left.evaluate(record)? || right.evaluate(record)?),
            Predicate::Not(inner) => Ok(!inner.evaluate(record)?),
        }
    }
}

enum Term {
    And,
    Or,
    Not,
    Leaf(Predicate),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainFilter {
    root: Option<Predicate>,
}

impl DomainFilter {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn from_predicate(predicate: Predicate) -> Self {
        Self {
            root: Some(predicate),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        if raw.trim().is_empty() {
            return Ok(Self::match_all());
        }
        let terms: Vec<Json> =
            serde_json::from_str(raw).map_err(|error| FilterError::Malformed(error.to_string()))?;

        let mut stack: Vec<Predicate> = Vec::new();
        for term in terms.into_iter().map(parse_term).rev() {
            match term? {
                Term::Leaf(predicate) => stack.push(predicate),
                Term::Not => {
                    let operand = stack
                        .pop()
                        .ok_or_else(|| FilterError::MissingOperand("!".into()))?;
                    stack.push(Predicate::Not(Box::new(operand)));
                }
                Term::And => {
                    let (left, right) = pop_pair(&mut stack, "&")?;
                    stack.push(Predicate::And(Box::new(left), Box::new(right)));
                }
                Term::Or => {
                    let (left, right) = pop_pair(&mut stack, "|")?;
                    stack.push(Predicate::Or(Box::new(left), Box::new(right)));
                }
            }
        }

        let root = stack
            .into_iter()
            .rev()
            .reduce(|left, right| Predicate::And(Box::new(left), Box::new(right)));
        Ok(Self { root })
    }

    pub fn is_match_all(&self) -> bool {
        self.root.is_none()
    }

    /// Every field the filter reads, in order of appearance.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        if let Some(root) = &self.root {
            root.collect_fields(&mut fields);
        }
        fields
    }

    /// Reject fields the model does not declare.
    pub fn validate(&self, model: &ModelDescriptor) -> Result<(), FilterError> {
        for field in self.fields() {
            if field != ID_FIELD && model.field(field).is_none() {
                return Err(FilterError::UnknownField {
                    field: field.to_string(),
                    model: model.model.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn matches(&self, record: &SourceRecord) -> Result<bool, FilterError> {
        match &self.root {
            None => Ok(true),
            Some(root) => root.evaluate(record),
        }
    }
}

fn pop_pair(stack: &mut Vec<Predicate>, symbol: &str) -> Result<(Predicate, Predicate), FilterError> {
    match (stack.pop(), stack.pop()) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(FilterError::MissingOperand(symbol.to_string())),
    }
}

fn parse_term(term: Json) -> Result<Term, FilterError> {
    match term {
        Json::String(symbol) => match symbol.as_str() {
            "&" => Ok(Term::And),
            "|" => Ok(Term::Or),
            "!" => Ok(Term::Not),
            _ => Err(FilterError::InvalidTerm(format!("\"{symbol}\""))),
        },
        Json::Array(parts) => {
            let rendered = Json::Array(parts.clone()).to_string();
            let [field, operator, value]: [Json; 3] = parts
                .try_into()
                .map_err(|_| FilterError::InvalidTerm(rendered.clone()))?;
            let (Json::String(field), Json::String(operator)) = (field, operator) else {
                return Err(FilterError::InvalidTerm(rendered));
            };
            let operator: Operator = operator.parse()?;
            let value = Literal::from_json(value).ok_or_else(|| FilterError::InvalidOperand {
                field: field.clone(),
                operator: operator.to_string(),
            })?;
            let is_list = matches!(value, Literal::List(_));
            let needs_text = matches!(
                operator,
                Operator::Like | Operator::NotLike | Operator::ILike | Operator::NotILike
            );
            if is_list != operator.expects_list()
                || (needs_text && !matches!(value, Literal::Text(_)))
            {
                return Err(FilterError::InvalidOperand {
                    field,
                    operator: operator.to_string(),
                });
            }
            Ok(Term::Leaf(Predicate::Condition {
                field,
                operator,
                value,
            }))
        }
        other => Err(FilterError::InvalidTerm(other.to_string())),
    }
}

fn evaluate_condition(
    record: &SourceRecord,
    field: &str,
    operator: Operator,
    literal: &Literal,
) -> Result<bool, FilterError> {
    let id_value;
    let value = if field == ID_FIELD {
        id_value = record
            .id
            .base_id()
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Null);
        &id_value
    } else {
        record.get(field)
    };

    match operator {
        Operator::Eq => Ok(equals(value, literal)),
        Operator::NotEq => Ok(!equals(value, literal)),
        Operator::In | Operator::NotIn => {
            let Literal::List(items) = literal else {
                return Err(FilterError::InvalidOperand {
                    field: field.to_string(),
                    operator: operator.to_string(),
                });
            };
            let found = items.iter().any(|item| equals(value, item));
            Ok(if operator == Operator::In { found } else { !found })
        }
        Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
            let Some(ordering) = compare(field, value, literal)? else {
                return Ok(false);
            };
            Ok(match operator {
                Operator::Lt => ordering == Ordering::Less,
                Operator::Le => ordering != Ordering::Greater,
                Operator::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
        Operator::Like | Operator::NotLike | Operator::ILike | Operator::NotILike => {
            let Literal::Text(pattern) = literal else {
                return Err(FilterError::InvalidOperand {
                    field: field.to_string(),
                    operator: operator.to_string(),
                });
            };
            let found = if !value.is_set() {
                false
            } else if matches!(operator, Operator::ILike | Operator::NotILike) {
                value
                    .to_string()
                    .to_lowercase()
                    .contains(&pattern.to_lowercase())
            } else {
                value.to_string().contains(pattern.as_str())
            };
            Ok(match operator {
                Operator::Like | Operator::ILike => found,
                _ => !found,
            })
        }
    }
}

fn equals(value: &FieldValue, literal: &Literal) -> bool {
    if literal.is_unset_marker() {
        return matches!(value, FieldValue::Null | FieldValue::Bool(false));
    }
    match (value, literal) {
        (FieldValue::Bool(left), Literal::Bool(right)) => left == right,
        (FieldValue::Integer(_) | FieldValue::Float(_), _) => {
            matches!((value.as_f64(), literal.as_f64()), (Some(left), Some(right)) if left == right)
        }
        (FieldValue::Reference(reference), Literal::Integer(id)) => reference.id == *id,
        (FieldValue::Text(left), Literal::Text(right)) => left == right,
        (FieldValue::Date(left), Literal::Text(right)) => parse_date(right) == Some(*left),
        (FieldValue::DateTime(left), Literal::Text(right)) => parse_datetime(right) == Some(*left),
        _ => false,
    }
}

/// `None` when the field is unset: unset values never satisfy an ordering.
fn compare(
    field: &str,
    value: &FieldValue,
    literal: &Literal,
) -> Result<Option<Ordering>, FilterError> {
    if matches!(value, FieldValue::Null | FieldValue::Bool(false)) {
        return Ok(None);
    }
    let ordering = match (value, literal) {
        (FieldValue::Integer(_) | FieldValue::Float(_), _) => value
            .as_f64()
            .zip(literal.as_f64())
            .and_then(|(left, right)| left.partial_cmp(&right)),
        (FieldValue::Reference(reference), Literal::Integer(id)) => Some(reference.id.cmp(id)),
        (FieldValue::Text(left), Literal::Text(right)) => Some(left.as_str().cmp(right.as_str())),
        (FieldValue::Date(left), Literal::Text(right)) => parse_date(right).map(|right| left.cmp(&right)),
        (FieldValue::DateTime(left), Literal::Text(right)) => {
            parse_datetime(right).map(|right| left.cmp(&right))
        }
        _ => None,
    };
    ordering.map(Some).ok_or_else(|| FilterError::Incomparable {
        field: field.to_string(),
        literal: literal.to_string(),
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, SERVER_DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(raw).map(|datetime| datetime.date()))
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, SERVER_DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, SERVER_DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
