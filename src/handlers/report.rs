use actix_web::web::{Data, Json, Query};
use chrono::Utc;

use crate::config::Config;
use crate::context::UserInfo;
use crate::core::aggregation::GroupKey;
use crate::core::ports::repository::Manager;
use crate::core::services::report::{self as service, DailyCount, Report, DEFAULT_DAYS};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::request::{DailyQuery, ResponsesQuery};

/// `groupBy` in the query overrides the configured grouping.
pub async fn report(_: UserInfo, Query(query): Query<ResponsesQuery>, manager: Data<PgSqlxManager>, config: Data<Config>) -> Result<Json<Report>, Error> {
    let key = match &query.group_by {
        Some(g) => g.parse::<GroupKey>()?,
        None => config.group_by,
    };
    let mut store = manager.db().await?;
    Ok(Json(service::report(&mut store, query.survey_id, query.form_id, key).await?))
}

pub async fn daily(_: UserInfo, Query(DailyQuery { survey_id, days }): Query<DailyQuery>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<DailyCount>>, Error> {
    let mut store = manager.db().await?;
    let volume = service::daily_volume(&mut store, survey_id, days.unwrap_or(DEFAULT_DAYS), Utc::now()).await?;
    Ok(Json(volume))
}
