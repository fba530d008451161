pub mod form;
pub mod question;
pub mod report;
pub mod response;
pub mod survey;
pub mod template;
pub mod user;

use actix_web::{
    cookie::{time::OffsetDateTime, CookieBuilder},
    web::{Data, Json},
    HttpResponse,
};
use chrono::{Duration, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::core::models::user::Profile;
use crate::core::ports::{repository::Manager, tokener::Tokener};
use crate::core::services::user as service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::{Claim, JWT_TOKEN};
use crate::request::Login;

const TOKEN_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    token: String,
    user: Profile,
}

pub async fn login(Json(Login { email, password }): Json<Login>, manager: Data<PgSqlxManager>, config: Data<Config>) -> Result<HttpResponse, Error> {
    let mut store = manager.db().await?;
    let user = service::login(&mut store, &email, &password).await?;
    let claim = Claim {
        user: user.id.to_string(),
        role: user.role,
        exp: (Utc::now() + Duration::days(TOKEN_DAYS)).timestamp(),
    };
    let tokener = JWT::new(config.jwt_secret.clone());
    let token = tokener.gen_token(&claim)?;
    log::info!("user {} logged in", user.id);
    Ok(HttpResponse::Ok()
        .cookie(CookieBuilder::new(JWT_TOKEN, token.clone()).path("/").http_only(true).finish())
        .json(LoginResponse { token, user: user.into() }))
}

pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(CookieBuilder::new(JWT_TOKEN, "").path("/").http_only(true).expires(OffsetDateTime::UNIX_EPOCH).finish())
        .finish()
}
