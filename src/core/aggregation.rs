//! Per-question summaries over a materialized set of responses.

use crate::core::answer::{decode_matrix, split_choices, DecodeWarning};
use crate::core::models::question::AnswerKind;
use crate::core::models::response::{AnswerValue, DetailWithQuestion, ResponseWithDetails};
use crate::error::Error;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

pub const MEAN_LABEL: &str = "Média";

/// How details are bucketed into aggregates.
///
/// `QuestionText` merges distinct questions that share the same wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupKey {
    #[default]
    QuestionId,
    QuestionText,
}

impl FromStr for GroupKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(GroupKey::QuestionId),
            "text" => Ok(GroupKey::QuestionText),
            _ => Err(Error::ValidationError(format!("invalid group key: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistic {
    pub label: String,
    /// Mean rounded to two decimals, always rendered with two digits.
    pub value: String,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub row: String,
    pub counts: Vec<LabelCount>,
}

impl MatrixRow {
    pub fn count(&self, column: &str) -> usize {
        self.counts.iter().find(|c| c.label == column).map(|c| c.count).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub rows: Vec<MatrixRow>,
    /// Every column seen in any row, first-seen order.
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Summary {
    Frequency(Vec<LabelCount>),
    Locality(Vec<LabelCount>),
    Statistic(Statistic),
    CrossTab(CrossTab),
    Texts(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub question_id: i32,
    pub question: String,
    pub answer_kind: Option<AnswerKind>,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Counter that remembers the order in which labels first appeared.
#[derive(Debug, Default)]
struct Tally {
    counts: Vec<LabelCount>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.counts[i].count += 1,
            None => {
                self.index.insert(label.to_owned(), self.counts.len());
                self.counts.push(LabelCount {
                    label: label.to_owned(),
                    count: 1,
                });
            }
        }
    }

    fn into_counts(self) -> Vec<LabelCount> {
        self.counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupId<'a> {
    Id(i32),
    Text(&'a str),
}

struct Entry<'a> {
    response_id: i32,
    detail: &'a DetailWithQuestion,
}

impl<'a> Entry<'a> {
    fn warn(&self, warning: DecodeWarning) {
        log::warn!(
            "skipping detail {} of response {} for question {}: {}",
            self.detail.id,
            self.response_id,
            self.detail.question.id,
            warning
        );
    }
}

struct Group<'a> {
    first: &'a DetailWithQuestion,
    entries: Vec<Entry<'a>>,
}

/// Summarizes every question found in `responses`, one aggregate per group in
/// first-seen order. Details whose stored value cannot be read are logged and
/// left out of their group.
pub fn aggregate(responses: &[ResponseWithDetails], key: GroupKey) -> Vec<Aggregate> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupId, usize> = HashMap::new();
    for response in responses {
        for detail in &response.details {
            let id = match key {
                GroupKey::QuestionId => GroupId::Id(detail.question.id),
                GroupKey::QuestionText => GroupId::Text(&detail.question.text),
            };
            let i = *index.entry(id).or_insert_with(|| {
                groups.push(Group {
                    first: detail,
                    entries: Vec::new(),
                });
                groups.len() - 1
            });
            groups[i].entries.push(Entry {
                response_id: response.header.id,
                detail,
            });
        }
    }
    groups.into_iter().map(summarize).collect()
}

fn summarize(group: Group) -> Aggregate {
    let kind = group.first.question.answer_kind;
    let values = group.entries.iter().filter_map(|e| match &e.detail.value {
        Some(v) => Some((e, v)),
        None => {
            e.warn(DecodeWarning::NoValue);
            None
        }
    });
    let summary = match kind {
        Some(AnswerKind::SingleChoice | AnswerKind::MultiChoice) => {
            let mut tally = Tally::default();
            for (e, v) in values {
                match v.as_str() {
                    Some(s) => split_choices(s).for_each(|label| tally.add(label)),
                    None => e.warn(DecodeWarning::NotText(v.clone())),
                }
            }
            Summary::Frequency(tally.into_counts())
        }
        Some(AnswerKind::Number | AnswerKind::Scale) => {
            let numbers: Vec<f64> = values
                .filter_map(|(e, v)| {
                    let n = v.as_number();
                    if n.is_none() {
                        e.warn(DecodeWarning::NotNumber(v.clone()));
                    }
                    n
                })
                .collect();
            Summary::Statistic(mean(&numbers))
        }
        Some(AnswerKind::Locality) => {
            let mut tally = Tally::default();
            for (e, v) in values {
                match v.as_str() {
                    Some(s) => tally.add(s),
                    None => e.warn(DecodeWarning::NotText(v.clone())),
                }
            }
            let mut counts = tally.into_counts();
            counts.sort_by(|a, b| b.count.cmp(&a.count));
            Summary::Locality(counts)
        }
        Some(AnswerKind::MatrixChoice) => Summary::CrossTab(cross_tab(values)),
        Some(AnswerKind::Text | AnswerKind::Date) | None => Summary::Texts(values.map(|(_, v)| v.to_display()).collect()),
    };
    Aggregate {
        question_id: group.first.question.id,
        question: group.first.question.text.clone(),
        answer_kind: kind,
        summary,
    }
}

fn mean(numbers: &[f64]) -> Statistic {
    let mean = match numbers.len() {
        0 => 0.0,
        n => numbers.iter().sum::<f64>() / n as f64,
    };
    Statistic {
        label: MEAN_LABEL.to_owned(),
        value: format!("{:.2}", (mean * 100.0).round() / 100.0),
        samples: numbers.len(),
    }
}

fn cross_tab<'e, 'a: 'e>(values: impl Iterator<Item = (&'e Entry<'a>, &'e AnswerValue)>) -> CrossTab {
    let mut rows: Vec<(String, Tally)> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<String> = Vec::new();
    let mut seen_columns: HashSet<String> = HashSet::new();
    for (e, v) in values {
        let pairs = match v.as_str() {
            Some(s) => decode_matrix(s),
            None => Err(DecodeWarning::NotText(v.clone())),
        };
        let pairs = match pairs {
            Ok(pairs) => pairs,
            Err(w) => {
                e.warn(w);
                continue;
            }
        };
        for (row, column) in pairs {
            let i = *row_index.entry(row.clone()).or_insert_with(|| {
                rows.push((row, Tally::default()));
                rows.len() - 1
            });
            rows[i].1.add(&column);
            if seen_columns.insert(column.clone()) {
                columns.push(column);
            }
        }
    }
    CrossTab {
        rows: rows
            .into_iter()
            .map(|(row, tally)| MatrixRow {
                row,
                counts: tally.into_counts(),
            })
            .collect(),
        columns,
    }
}
