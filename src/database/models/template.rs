use super::stored;
use crate::core::models::question::QuestionOptions;
use crate::core::models::template::{Template, TemplateQuestion};
use crate::error::Error;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct TemplateRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for Template {
    type Error = Error;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        Ok(Template {
            id: row.id,
            role: stored("template role", &row.role)?,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TemplateQuestionRow {
    pub id: i32,
    pub template_id: i32,
    pub text: String,
    pub answer_kind: String,
    pub required: bool,
    pub position: i32,
    pub options: Json<QuestionOptions>,
}

impl TryFrom<TemplateQuestionRow> for TemplateQuestion {
    type Error = Error;

    fn try_from(row: TemplateQuestionRow) -> Result<Self, Self::Error> {
        Ok(TemplateQuestion {
            id: row.id,
            template_id: row.template_id,
            answer_kind: stored("answer kind", &row.answer_kind)?,
            text: row.text,
            required: row.required,
            position: row.position,
            options: row.options.0,
        })
    }
}
