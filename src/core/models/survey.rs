use super::common::{require_text, text_enum};
use super::form::Form;
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    #[derive(Default)]
    pub enum SurveyKind {
        #[default]
        Event => "EVENT",
        General => "GENERAL",
    }
}

text_enum! {
    #[derive(Default)]
    pub enum SurveyStatus {
        #[default]
        Planned => "PLANNED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Survey {
    pub id: i32,
    pub title: String,
    pub kind: SurveyKind,
    pub status: SurveyStatus,
    pub description: Option<String>,
    pub location: Option<String>,
    pub project_title: Option<String>,
    pub proponent: Option<String>,
    pub municipality: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted both on creation and on full update.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Insert {
    pub title: String,
    #[serde(default)]
    pub kind: SurveyKind,
    #[serde(default)]
    pub status: SurveyStatus,
    pub description: Option<String>,
    pub location: Option<String>,
    pub project_title: Option<String>,
    pub proponent: Option<String>,
    pub municipality: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

pub type Update = Insert;

impl Insert {
    pub fn validate(&self) -> Result<(), Error> {
        require_text("title", &self.title)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Error::ValidationError("end_date must not be before start_date".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub forms: Vec<Form>,
}
