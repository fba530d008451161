use actix_web::web::{Data, Json, Path};

use crate::context::UserInfo;
use crate::core::models::question::Definition;
use crate::core::models::template::{Insert, Template, TemplateDetail, Update};
use crate::core::ports::repository::Manager;
use crate::core::services::template as service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, List};

pub async fn create(user: UserInfo, Json(body): Json<Insert>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    user.require_admin()?;
    let mut store = manager.db().await?;
    let id = service::create_template(&mut store, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(user: UserInfo, id: Path<(i32,)>, Json(body): Json<Update>, manager: Data<PgSqlxManager>) -> Result<Json<TemplateDetail>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::update_template(&mut store, id, body).await?;
    Ok(Json(service::template_detail(&mut store, id).await?))
}

pub async fn list(_: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<List<Template>>, Error> {
    let mut store = manager.db().await?;
    let templates = service::list_templates(&mut store).await?;
    Ok(Json(templates.into()))
}

pub async fn detail(_: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<TemplateDetail>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::template_detail(&mut store, id).await?))
}

pub async fn delete(user: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::delete_template(&mut store, id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}

pub async fn add_question(
    user: UserInfo,
    template_id: Path<(i32,)>,
    Json(body): Json<Definition>,
    manager: Data<PgSqlxManager>,
) -> Result<Json<CreateResponse>, Error> {
    let template_id = template_id.into_inner().0;
    user.require_admin()?;
    let id = service::add_template_question(manager.tx().await?, template_id, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn delete_question(user: UserInfo, path: Path<(i32, i32)>, manager: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let (template_id, id) = path.into_inner();
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::delete_template_question(&mut store, template_id, id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}
