use actix_web::web::{Data, Json, Path};

use crate::context::UserInfo;
use crate::core::models::survey::{Insert, Survey, SurveyDetail, Update};
use crate::core::ports::repository::Manager;
use crate::core::services::{survey as service, template::apply_template};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::request::ApplyTemplate;
use crate::response::{CreateResponse, DeleteResponse, List};

pub async fn create(user: UserInfo, Json(body): Json<Insert>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    user.require_admin()?;
    let mut store = manager.db().await?;
    let id = service::create_survey(&mut store, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(user: UserInfo, id: Path<(i32,)>, Json(body): Json<Update>, manager: Data<PgSqlxManager>) -> Result<Json<Survey>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::update_survey(&mut store, id, body).await?;
    let detail = service::survey_detail(&mut store, id).await?;
    Ok(Json(detail.survey))
}

pub async fn list(_: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<List<Survey>>, Error> {
    let mut store = manager.db().await?;
    let surveys = service::list_surveys(&mut store).await?;
    Ok(Json(surveys.into()))
}

pub async fn detail(_: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<SurveyDetail>, Error> {
    let id = id.into_inner().0;
    let mut store = manager.db().await?;
    Ok(Json(service::survey_detail(&mut store, id).await?))
}

pub async fn delete(user: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::delete_survey(&mut store, id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}

pub async fn apply(
    user: UserInfo,
    survey_id: Path<(i32,)>,
    Json(ApplyTemplate { template_id, name }): Json<ApplyTemplate>,
    manager: Data<PgSqlxManager>,
) -> Result<Json<CreateResponse>, Error> {
    let survey_id = survey_id.into_inner().0;
    user.require_admin()?;
    let id = apply_template(manager.tx().await?, survey_id, template_id, name).await?;
    Ok(Json(CreateResponse { id }))
}
