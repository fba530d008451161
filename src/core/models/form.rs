use super::common::{require_text, text_enum};
use super::question::Question;
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    #[derive(Default)]
    pub enum FormRole {
        #[default]
        Participant => "PARTICIPANT",
        Exhibitor => "EXHIBITOR",
        Organizer => "ORGANIZER",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub id: i32,
    pub survey_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub role: FormRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Insert {
    pub survey_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub role: FormRole,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub name: String,
    pub description: Option<String>,
    pub role: FormRole,
    pub active: bool,
}

impl Insert {
    pub fn validate(&self) -> Result<(), Error> {
        require_text("name", &self.name)
    }
}

impl Update {
    pub fn validate(&self) -> Result<(), Error> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Default)]
pub struct Query {
    pub survey_id_eq: Option<i32>,
    pub active_eq: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct FormDetail {
    #[serde(flatten)]
    pub form: Form,
    pub questions: Vec<Question>,
}
