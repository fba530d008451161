use actix_web::http::header::USER_AGENT;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpRequest;
use chrono::Utc;

use crate::context::UserInfo;
use crate::core::models::response::{ClientMeta, ResponseWithDetails, Submission};
use crate::core::ports::repository::Manager;
use crate::core::services::response as service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::request::ResponsesQuery;
use crate::response::{CreateResponse, DeleteResponse, List};

static FORWARDED_FOR: &str = "X-Forwarded-For";

/// First address of `X-Forwarded-For`, else the peer address.
fn client_meta(req: &HttpRequest) -> ClientMeta {
    let forwarded = req
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty());
    ClientMeta {
        ip: forwarded.or_else(|| req.peer_addr().map(|a| a.ip().to_string())),
        user_agent: req.headers().get(USER_AGENT).and_then(|v| v.to_str().ok()).map(str::to_owned),
    }
}

/// Unauthenticated.
pub async fn submit(req: HttpRequest, Json(body): Json<Submission>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    let id = service::submit(manager.tx().await?, body, client_meta(&req), Utc::now()).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn list(_: UserInfo, Query(query): Query<ResponsesQuery>, manager: Data<PgSqlxManager>) -> Result<Json<List<ResponseWithDetails>>, Error> {
    let mut store = manager.db().await?;
    let responses = service::list_responses(&mut store, query.survey_id, query.form_id).await?;
    Ok(Json(responses.into()))
}

pub async fn delete(user: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::delete_response(&mut store, id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}
