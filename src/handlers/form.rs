use actix_web::web::{Data, Json, Path, Query};

use crate::context::UserInfo;
use crate::core::models::form::{self, Form, FormDetail, Insert, Update};
use crate::core::ports::repository::Manager;
use crate::core::services::form as service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::request::FormsQuery;
use crate::response::{CreateResponse, DeleteResponse, List};

pub async fn create(user: UserInfo, Json(body): Json<Insert>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    user.require_admin()?;
    let mut store = manager.db().await?;
    let id = service::create_form(&mut store, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(user: UserInfo, id: Path<(i32,)>, Json(body): Json<Update>, manager: Data<PgSqlxManager>) -> Result<Json<FormDetail>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::update_form(&mut store, id, body).await?;
    Ok(Json(service::form_detail(&mut store, id).await?))
}

pub async fn list(_: UserInfo, Query(FormsQuery { survey_id }): Query<FormsQuery>, manager: Data<PgSqlxManager>) -> Result<Json<List<Form>>, Error> {
    let mut store = manager.db().await?;
    let forms = service::list_forms(
        &mut store,
        form::Query {
            survey_id_eq: survey_id,
            ..default::default()
        },
    )
    .await?;
    Ok(Json(forms.into()))
}

pub async fn detail(_: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<FormDetail>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::form_detail(&mut store, id).await?))
}

/// Unauthenticated; only active forms are visible.
pub async fn public(id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<FormDetail>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::public_form(&mut store, id).await?))
}

pub async fn delete(user: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::delete_form(&mut store, id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}
