use crate::core::models::user::Role;
use crate::error::Error;
use actix_web::{FromRequest, HttpMessage};
use std::future::{ready, Ready};

/// The authenticated caller, put into request extensions by the jwt middleware.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i32,
    pub role: Role,
}

impl UserInfo {
    pub fn require_admin(&self) -> Result<(), Error> {
        match self.role {
            Role::Admin => Ok(()),
            Role::User => Err(Error::Forbidden),
        }
    }
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Self>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(Error::Unauthorized)),
        }
    }
}
