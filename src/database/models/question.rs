use super::stored;
use crate::core::models::question::{Question, QuestionOptions};
use crate::error::Error;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i32,
    pub form_id: i32,
    pub text: String,
    pub answer_kind: String,
    pub required: bool,
    pub position: i32,
    pub options: Json<QuestionOptions>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = Error;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            form_id: row.form_id,
            answer_kind: stored("answer kind", &row.answer_kind)?,
            text: row.text,
            required: row.required,
            position: row.position,
            options: row.options.0,
        })
    }
}
