use crate::core::models::response::{DetailWithQuestion, QuestionRef, ResponseHeader, ValueSlots};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ResponseRow {
    pub id: i32,
    pub form_id: i32,
    pub survey_id: i32,
    pub submitted_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl From<ResponseRow> for ResponseHeader {
    fn from(row: ResponseRow) -> Self {
        ResponseHeader {
            id: row.id,
            form_id: row.form_id,
            survey_id: row.survey_id,
            submitted_at: row.submitted_at,
            ip: row.ip,
            user_agent: row.user_agent,
        }
    }
}

/// A response detail joined with the text and kind of its question.
#[derive(Debug, Clone, FromRow)]
pub struct DetailRow {
    pub id: i32,
    pub response_id: i32,
    pub question_id: i32,
    pub question_text: String,
    pub answer_kind: String,
    pub text_value: Option<String>,
    pub number_value: Option<f64>,
    pub date_value: Option<DateTime<Utc>>,
    pub option_value: Option<String>,
}

impl From<DetailRow> for DetailWithQuestion {
    fn from(row: DetailRow) -> Self {
        let slots = ValueSlots {
            text_value: row.text_value,
            number_value: row.number_value,
            date_value: row.date_value,
            option_value: row.option_value,
        };
        DetailWithQuestion {
            id: row.id,
            question: QuestionRef {
                id: row.question_id,
                text: row.question_text,
                answer_kind: row.answer_kind.parse().ok(),
            },
            value: slots.into_value(),
        }
    }
}
