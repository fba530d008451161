use super::stored;
use crate::core::models::survey::Survey;
use crate::error::Error;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SurveyRow {
    pub id: i32,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub project_title: Option<String>,
    pub proponent: Option<String>,
    pub municipality: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SurveyRow> for Survey {
    type Error = Error;

    fn try_from(row: SurveyRow) -> Result<Self, Self::Error> {
        Ok(Survey {
            id: row.id,
            kind: stored("survey kind", &row.kind)?,
            status: stored("survey status", &row.status)?,
            title: row.title,
            description: row.description,
            location: row.location,
            project_title: row.project_title,
            proponent: row.proponent,
            municipality: row.municipality,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        })
    }
}
