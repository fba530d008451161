//! Conversion between raw submitted answers and stored detail values.
//!
//! Multi-choice answers are stored as one string with the selected labels
//! joined by [`MULTI_CHOICE_DELIMITER`]; matrix answers are stored as a JSON
//! object mapping row label to column label.

use crate::core::models::question::AnswerKind;
use crate::core::models::response::AnswerValue;
use crate::error::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use itertools::Itertools;
use serde_json::{Map, Value};
use thiserror::Error as ThisError;

pub const MULTI_CHOICE_DELIMITER: &str = ", ";

/// Why a stored value could not be read back during aggregation.
#[derive(Debug, ThisError)]
pub enum DecodeWarning {
    #[error("detail holds no single value")]
    NoValue,

    #[error("expected a textual value, found {0:?}")]
    NotText(AnswerValue),

    #[error("expected a numeric value, found {0:?}")]
    NotNumber(AnswerValue),

    #[error("malformed matrix value: {0}")]
    MalformedMatrix(#[from] serde_json::Error),

    #[error("matrix value is not an object")]
    MatrixNotObject,

    #[error("matrix cell of row {0:?} is not a string")]
    MatrixCell(String),
}

/// Maps one raw answer to the value stored for a question of kind `kind`.
///
/// Returns `Ok(None)` when the answer is absent (`null`, `""`, an empty list
/// or an empty object). Requiredness is not checked here.
pub fn encode(kind: AnswerKind, raw: &Value) -> Result<Option<AnswerValue>, Error> {
    if is_absent(raw) {
        return Ok(None);
    }
    let value = match kind {
        AnswerKind::Text => AnswerValue::Text(stringify(raw)),
        AnswerKind::Locality => AnswerValue::Text(scalar_text(kind, raw)?),
        AnswerKind::Number | AnswerKind::Scale => AnswerValue::Number(parse_number(raw)?),
        AnswerKind::Date => match raw {
            Value::String(s) => AnswerValue::Date(parse_date(s)?),
            other => return Err(invalid(kind, other)),
        },
        AnswerKind::SingleChoice => match raw {
            Value::Array(items) => AnswerValue::Option(join_choices(&choice_labels(kind, items)?)),
            other => AnswerValue::Option(choice_label(kind, other)?),
        },
        AnswerKind::MultiChoice => match raw {
            Value::Array(items) => {
                let labels = choice_labels(kind, items)?;
                if labels.is_empty() {
                    return Ok(None);
                }
                AnswerValue::Option(join_choices(&labels))
            }
            other => AnswerValue::Option(choice_label(kind, other)?),
        },
        AnswerKind::MatrixChoice => {
            let cells = match raw {
                Value::Object(map) => map.clone(),
                Value::String(s) => match serde_json::from_str::<Value>(s) {
                    Ok(Value::Object(map)) => map,
                    _ => return Err(invalid(kind, raw)),
                },
                other => return Err(invalid(kind, other)),
            };
            if cells.is_empty() {
                return Ok(None);
            }
            AnswerValue::Option(encode_matrix(&cells)?)
        }
    };
    Ok(Some(value))
}

fn is_absent(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn invalid(kind: AnswerKind, raw: &Value) -> Error {
    Error::ValidationError(format!("{} is not a valid {} answer", raw, kind))
}

fn stringify(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scalar_text(kind: AnswerKind, raw: &Value) -> Result<String, Error> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(kind, other)),
    }
}

fn choice_labels(kind: AnswerKind, items: &[Value]) -> Result<Vec<String>, Error> {
    items
        .iter()
        .filter(|v| !is_absent(v))
        .map(|v| choice_label(kind, v))
        .collect()
}

fn choice_label(kind: AnswerKind, raw: &Value) -> Result<String, Error> {
    let label = scalar_text(kind, raw)?;
    if label.contains(MULTI_CHOICE_DELIMITER) {
        return Err(Error::ValidationError(format!(
            "choice {:?} must not contain {:?}",
            label, MULTI_CHOICE_DELIMITER
        )));
    }
    Ok(label)
}

fn parse_number(raw: &Value) -> Result<f64, Error> {
    let n = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(Error::ValidationError(format!("{} is not a number", raw))),
    }
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` (read as UTC) and
/// plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, Error> {
    let s = s.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Ok(d.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)) {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(Error::ValidationError(format!("{:?} is not a valid date", s)))
}

pub fn join_choices<S: AsRef<str>>(labels: &[S]) -> String {
    labels.iter().map(|l| l.as_ref()).join(MULTI_CHOICE_DELIMITER)
}

pub fn split_choices(stored: &str) -> impl Iterator<Item = &str> {
    stored.split(MULTI_CHOICE_DELIMITER)
}

fn encode_matrix(cells: &Map<String, Value>) -> Result<String, Error> {
    if let Some((row, _)) = cells.iter().find(|(_, col)| !col.is_string()) {
        return Err(Error::ValidationError(format!("matrix answer for row {:?} must be a column label", row)));
    }
    Ok(serde_json::to_string(cells)?)
}

/// Reads a stored matrix answer back as `(row, column)` pairs in stored order.
pub fn decode_matrix(stored: &str) -> Result<Vec<(String, String)>, DecodeWarning> {
    let cells = match serde_json::from_str::<Value>(stored)? {
        Value::Object(map) => map,
        _ => return Err(DecodeWarning::MatrixNotObject),
    };
    cells
        .into_iter()
        .map(|(row, col)| match col {
            Value::String(col) => Ok((row, col)),
            _ => Err(DecodeWarning::MatrixCell(row)),
        })
        .collect()
}
