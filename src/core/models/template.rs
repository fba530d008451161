use super::common::require_text;
use super::form::FormRole;
use super::question::{AnswerKind, Definition, QuestionOptions};
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable, survey-less form definition. Applying it copies its questions
/// into a new form once; later edits of either side are not propagated.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub role: FormRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Insert {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub role: FormRole,
}

pub type Update = Insert;

impl Insert {
    pub fn validate(&self) -> Result<(), Error> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateQuestion {
    pub id: i32,
    pub template_id: i32,
    pub text: String,
    pub answer_kind: AnswerKind,
    pub required: bool,
    pub position: i32,
    pub options: QuestionOptions,
}

#[derive(Debug, Clone)]
pub struct QuestionInsert {
    pub template_id: i32,
    pub text: String,
    pub answer_kind: AnswerKind,
    pub required: bool,
    pub position: i32,
    pub options: QuestionOptions,
}

impl QuestionInsert {
    pub fn new(template_id: i32, position: i32, definition: Definition) -> Self {
        Self {
            template_id,
            text: definition.text,
            answer_kind: definition.answer_kind,
            required: definition.required,
            position,
            options: definition.options,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: Template,
    pub questions: Vec<TemplateQuestion>,
}
