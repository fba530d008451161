use actix_web::web::{Data, Json, Path};

use crate::context::UserInfo;
use crate::core::models::user::{Create, Profile, Update};
use crate::core::ports::repository::{Manager, UserCommon};
use crate::core::services::user as service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, List};

pub async fn me(user: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<Profile>, Error> {
    let mut store = manager.db().await?;
    let me = UserCommon::get(&mut store, user.id).await?;
    Ok(Json(me.into()))
}

pub async fn list(user: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<List<Profile>>, Error> {
    user.require_admin()?;
    let mut store = manager.db().await?;
    let users = service::list_users(&mut store).await?;
    Ok(Json(users.into()))
}

pub async fn create(user: UserInfo, Json(body): Json<Create>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    user.require_admin()?;
    let mut store = manager.db().await?;
    let id = service::create_user(&mut store, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(user: UserInfo, id: Path<(i32,)>, Json(body): Json<Update>, manager: Data<PgSqlxManager>) -> Result<Json<Profile>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::update_user(&mut store, id, body).await?;
    let updated = UserCommon::get(&mut store, id).await?;
    Ok(Json(updated.into()))
}

pub async fn delete(user: UserInfo, id: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let id = id.into_inner().0;
    user.require_admin()?;
    let mut store = manager.db().await?;
    service::delete_user(&mut store, user.id, id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}
