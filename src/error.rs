use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use dotenv::Error as DotError;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use serde_json::json;
use sqlx::migrate::MigrateError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migrate error: {0}")]
    MigrateError(#[from] MigrateError),

    #[error("dotenv error: {0}")]
    DotEnvError(#[from] DotError),

    #[error("jwt error: {0}")]
    JWTError(#[from] JsonWebTokenError),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("bussiness error: {0}")]
    BusinessError(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("server error: {0}")]
    ServerError(String),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::DatabaseError(sqlx::Error::RowNotFound) | Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::ValidationError(_) | Error::BusinessError(_) | Error::JsonError(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Unauthorized | Error::JWTError(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{}", self);
            "internal server error".to_owned()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "message": message }))
    }
}
