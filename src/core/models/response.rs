use super::question::AnswerKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The single value held by one response detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Option(String),
}

impl AnswerValue {
    /// Textual content of the text and option slots.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) | AnswerValue::Option(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn to_display(&self) -> String {
        match self {
            AnswerValue::Text(s) | AnswerValue::Option(s) => s.clone(),
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Date(d) => d.to_rfc3339(),
        }
    }

    pub fn into_slots(self) -> ValueSlots {
        let mut slots = ValueSlots::default();
        match self {
            AnswerValue::Text(s) => slots.text_value = Some(s),
            AnswerValue::Number(n) => slots.number_value = Some(n),
            AnswerValue::Date(d) => slots.date_value = Some(d),
            AnswerValue::Option(s) => slots.option_value = Some(s),
        }
        slots
    }
}

/// Storage shape of a detail value: four nullable columns of which exactly
/// one is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSlots {
    pub text_value: Option<String>,
    pub number_value: Option<f64>,
    pub date_value: Option<DateTime<Utc>>,
    pub option_value: Option<String>,
}

impl ValueSlots {
    /// `None` unless exactly one slot is populated.
    pub fn into_value(self) -> Option<AnswerValue> {
        match (self.text_value, self.number_value, self.date_value, self.option_value) {
            (Some(s), None, None, None) => Some(AnswerValue::Text(s)),
            (None, Some(n), None, None) => Some(AnswerValue::Number(n)),
            (None, None, Some(d), None) => Some(AnswerValue::Date(d)),
            (None, None, None, Some(s)) => Some(AnswerValue::Option(s)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseHeader {
    pub id: i32,
    pub form_id: i32,
    pub survey_id: i32,
    pub submitted_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Question metadata joined onto each detail. `answer_kind` is `None` when the
/// stored kind is not one this build knows about.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRef {
    pub id: i32,
    pub text: String,
    pub answer_kind: Option<AnswerKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailWithQuestion {
    pub id: i32,
    pub question: QuestionRef,
    /// `None` when the stored slots are not exactly one populated value.
    pub value: Option<AnswerValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseWithDetails {
    #[serde(flatten)]
    pub header: ResponseHeader,
    pub details: Vec<DetailWithQuestion>,
}

#[derive(Debug, Clone)]
pub struct HeaderInsert {
    pub form_id: i32,
    pub survey_id: i32,
    pub submitted_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DetailInsert {
    pub response_id: i32,
    pub question_id: i32,
    pub value: AnswerValue,
}

#[derive(Debug, Default)]
pub struct Query {
    pub survey_id_eq: Option<i32>,
    pub form_id_eq: Option<i32>,
    pub submitted_since: Option<DateTime<Utc>>,
    pub newest_first: bool,
}

/// Public submission payload: raw answers keyed by question id.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    #[serde(alias = "formId")]
    pub form_id: i32,
    #[serde(default)]
    pub answers: HashMap<i32, serde_json::Value>,
}

/// Request metadata captured alongside a submission.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
