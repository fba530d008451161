use super::common::{require_text, text_enum};
use crate::core::answer::MULTI_CHOICE_DELIMITER;
use crate::error::Error;
use serde::{Deserialize, Serialize};

text_enum! {
    /// Declared answer type of a question. Selects the value slot on write
    /// and the summary computed on read.
    pub enum AnswerKind {
        Text => "TEXT",
        Number => "NUMBER",
        SingleChoice => "SINGLE_CHOICE",
        MultiChoice => "MULTI_CHOICE",
        Scale => "SCALE",
        Date => "DATE",
        MatrixChoice => "MATRIX_CHOICE",
        Locality => "LOCALITY",
    }
}

impl AnswerKind {
    pub fn is_choice(&self) -> bool {
        matches!(self, AnswerKind::SingleChoice | AnswerKind::MultiChoice)
    }
}

/// Structured options of a question. Which variant is legal depends on the
/// question's [`AnswerKind`], see [`QuestionOptions::validate_for`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionOptions {
    Choices {
        labels: Vec<String>,
        #[serde(default)]
        include_other: bool,
    },
    Matrix {
        rows: Vec<String>,
        columns: Vec<String>,
    },
    Scale {
        min: i32,
        max: i32,
        #[serde(default)]
        label_min: Option<String>,
        #[serde(default)]
        label_max: Option<String>,
    },
    #[default]
    None,
}

fn require_labels(what: &str, labels: &[String]) -> Result<(), Error> {
    if labels.is_empty() {
        return Err(Error::ValidationError(format!("at least one {} is required", what)));
    }
    if labels.iter().any(|l| l.trim().is_empty()) {
        return Err(Error::ValidationError(format!("{} labels must not be blank", what)));
    }
    Ok(())
}

impl QuestionOptions {
    pub fn validate_for(&self, kind: AnswerKind) -> Result<(), Error> {
        match (kind, self) {
            (AnswerKind::SingleChoice | AnswerKind::MultiChoice, QuestionOptions::Choices { labels, .. }) => {
                require_labels("option", labels)?;
                // stored answers are joined with the delimiter, a label containing it could not be split back
                if let Some(label) = labels.iter().find(|l| l.contains(MULTI_CHOICE_DELIMITER)) {
                    return Err(Error::ValidationError(format!("option label {:?} must not contain {:?}", label, MULTI_CHOICE_DELIMITER)));
                }
                Ok(())
            }
            (AnswerKind::MatrixChoice, QuestionOptions::Matrix { rows, columns }) => {
                require_labels("row", rows)?;
                require_labels("column", columns)
            }
            (AnswerKind::Scale, QuestionOptions::Scale { min, max, .. }) => {
                if min >= max {
                    return Err(Error::ValidationError(format!("scale min ({}) must be lower than max ({})", min, max)));
                }
                Ok(())
            }
            (AnswerKind::Scale, QuestionOptions::None) => Ok(()),
            (AnswerKind::Text | AnswerKind::Number | AnswerKind::Date | AnswerKind::Locality, QuestionOptions::None) => Ok(()),
            (kind, _) => Err(Error::ValidationError(format!("options do not match answer kind {}", kind))),
        }
    }
}

/// Authoring payload shared by form questions and template questions.
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub text: String,
    pub answer_kind: AnswerKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: QuestionOptions,
}

impl Definition {
    pub fn validate(&self) -> Result<(), Error> {
        require_text("text", &self.text)?;
        self.options.validate_for(self.answer_kind)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: i32,
    pub form_id: i32,
    pub text: String,
    pub answer_kind: AnswerKind,
    pub required: bool,
    pub position: i32,
    pub options: QuestionOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Create {
    pub form_id: i32,
    #[serde(flatten)]
    pub definition: Definition,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub form_id: i32,
    pub text: String,
    pub answer_kind: AnswerKind,
    pub required: bool,
    pub position: i32,
    pub options: QuestionOptions,
}

pub type Update = Definition;

#[derive(Debug, Default)]
pub struct Query {
    pub form_id_eq: Option<i32>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn choices(labels: &[&str]) -> QuestionOptions {
        QuestionOptions::Choices {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            include_other: false,
        }
    }

    #[test]
    fn test_options_must_match_kind() {
        assert!(choices(&["Sim", "Não"]).validate_for(AnswerKind::SingleChoice).is_ok());
        assert!(choices(&["Sim"]).validate_for(AnswerKind::Text).is_err());
        assert!(QuestionOptions::None.validate_for(AnswerKind::SingleChoice).is_err());
        assert!(QuestionOptions::None.validate_for(AnswerKind::Scale).is_ok());
        assert!(choices(&[]).validate_for(AnswerKind::MultiChoice).is_err());
        assert!(choices(&["ok", " "]).validate_for(AnswerKind::MultiChoice).is_err());
    }

    #[test]
    fn test_choice_labels_reject_delimiter() {
        assert!(choices(&["Rádio, TV", "Internet"]).validate_for(AnswerKind::MultiChoice).is_err());
        assert!(choices(&["Sim, claro", "Não"]).validate_for(AnswerKind::SingleChoice).is_err());
        assert!(choices(&["Sim,claro", "Não"]).validate_for(AnswerKind::SingleChoice).is_ok());
    }

    #[test]
    fn test_matrix_and_scale_options() {
        let matrix = QuestionOptions::Matrix {
            rows: vec!["Transporte".into()],
            columns: vec![],
        };
        assert!(matrix.validate_for(AnswerKind::MatrixChoice).is_err());
        let scale = QuestionOptions::Scale {
            min: 5,
            max: 1,
            label_min: None,
            label_max: None,
        };
        assert!(scale.validate_for(AnswerKind::Scale).is_err());
    }

    #[test]
    fn test_options_json_shape() {
        let opts: QuestionOptions = serde_json::from_str(r#"{"type":"matrix","rows":["Transporte"],"columns":["Bom","Ótimo"]}"#).unwrap();
        assert_eq!(
            opts,
            QuestionOptions::Matrix {
                rows: vec!["Transporte".into()],
                columns: vec!["Bom".into(), "Ótimo".into()],
            }
        );
        let def: Definition = serde_json::from_str(r#"{"text":"Nome","answer_kind":"TEXT"}"#).unwrap();
        assert_eq!(def.options, QuestionOptions::None);
        assert!(!def.required);
    }
}
