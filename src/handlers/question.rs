use actix_web::web::{Data, Json, Path, Query};

use crate::context::UserInfo;
use crate::core::models::question::{Create, Question, Update};
use crate::core::ports::repository::Manager;
use crate::core::services::question as service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::request::QuestionsQuery;
use crate::response::{CreateResponse, DeleteResponse, List};

pub async fn create(user: UserInfo, Json(body): Json<Create>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    user.require_admin()?;
    let id = service::create_question(manager.tx().await?, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(user: UserInfo, id: Path<(i32,)>, Json(body): Json<Update>, manager: Data<PgSqlxManager>) -> Result<Json<Question>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::update_question(&mut store, id, body).await?;
    Ok(Json(service::question_detail(&mut store, id).await?))
}

pub async fn list(_: UserInfo, Query(QuestionsQuery { form_id }): Query<QuestionsQuery>, manager: Data<PgSqlxManager>) -> Result<Json<List<Question>>, Error> {
    let mut store = manager.db().await?;
    let questions = service::list_questions(&mut store, form_id).await?;
    Ok(Json(questions.into()))
}

pub async fn detail(_: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Question>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::question_detail(&mut store, id).await?))
}

pub async fn delete(user: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::delete_question(&mut store, id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}
