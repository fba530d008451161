use crate::core::aggregation::{aggregate, GroupKey};
use crate::core::models::response::Query;
use crate::core::ports::repository::{ResponseCommon, Store};
use crate::core::presentation::{annotate, ReportItem};
use crate::error::Error;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_DAYS: i64 = 7;
pub const MAX_DAYS: i64 = 366;

#[derive(Debug, Serialize)]
pub struct Report {
    pub total: usize,
    pub aggregates: Vec<ReportItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Aggregates every response of a survey or a form, oldest first, and
/// recommends a chart for each question.
pub async fn report<S>(store: &mut S, survey_id: Option<i32>, form_id: Option<i32>, key: GroupKey) -> Result<Report, Error>
where
    S: Store,
{
    if survey_id.is_none() && form_id.is_none() {
        return Err(Error::ValidationError("surveyId or formId is required".into()));
    }
    let responses = ResponseCommon::query(
        store,
        &Query {
            survey_id_eq: survey_id,
            form_id_eq: form_id,
            ..default::default()
        },
    )
    .await?;
    let aggregates = annotate(aggregate(&responses, key));
    Ok(Report {
        total: responses.len(),
        aggregates,
    })
}

/// Responses per UTC day over the `days` days ending at `now`, oldest first,
/// with empty days reported as zero.
pub async fn daily_volume<S>(store: &mut S, survey_id: Option<i32>, days: i64, now: DateTime<Utc>) -> Result<Vec<DailyCount>, Error>
where
    S: Store,
{
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(Error::ValidationError(format!("days must be between 1 and {}", MAX_DAYS)));
    }
    let first = now.date_naive() - Duration::days(days - 1);
    let since = first
        .and_hms_opt(0, 0, 0)
        .map(|d| Utc.from_utc_datetime(&d))
        .ok_or_else(|| Error::ServerError(format!("invalid date {}", first)))?;
    let headers = ResponseCommon::headers(
        store,
        &Query {
            survey_id_eq: survey_id,
            submitted_since: Some(since),
            ..default::default()
        },
    )
    .await?;
    let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
    for h in &headers {
        *per_day.entry(h.submitted_at.date_naive()).or_default() += 1;
    }
    Ok((0..days)
        .map(|i| {
            let date = first + Duration::days(i);
            DailyCount {
                date,
                count: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect())
}
