use super::stored;
use crate::core::models::form::Form;
use crate::error::Error;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct FormRow {
    pub id: i32,
    pub survey_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FormRow> for Form {
    type Error = Error;

    fn try_from(row: FormRow) -> Result<Self, Self::Error> {
        Ok(Form {
            id: row.id,
            survey_id: row.survey_id,
            role: stored("form role", &row.role)?,
            name: row.name,
            description: row.description,
            active: row.active,
            created_at: row.created_at,
        })
    }
}
