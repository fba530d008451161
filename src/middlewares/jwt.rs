use crate::context::UserInfo;
use crate::core::models::user::Role;
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error as CrateError;
use crate::impls::tokener::jwt::JWT;
use actix_web::dev::{Service, ServiceRequest, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, HttpMessage};
use serde::{Deserialize, Serialize};
use futures::future::LocalBoxFuture;

pub static JWT_TOKEN: &str = "JWT_TOKEN";

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub role: Role,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }

    fn role(&self) -> Role {
        self.role
    }
}

/// The token comes from the `JWT_TOKEN` cookie, or else from an
/// `Authorization` header with or without the `Bearer ` prefix.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(JWT_TOKEN) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_owned());
        }
    }
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    Some(header.strip_prefix("Bearer ").unwrap_or(header).to_owned())
}

fn authenticate(tokener: &JWT, token: &str) -> Result<UserInfo, CrateError> {
    let claim: Claim = tokener.verify_token(token)?;
    let id = claim.user().parse::<i32>().map_err(|_| CrateError::Unauthorized)?;
    Ok(UserInfo { id, role: claim.role() })
}

pub struct JWTMiddleware {
    secret: Vec<u8>,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        let secret = self.secret.clone();
        Box::pin(async move {
            Ok(JWTService {
                tokener: JWT::new(secret),
                next_service: service,
            })
        })
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: S,
}

impl<S> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    fn poll_ready(&self, ctx: &mut core::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user = match extract_token(&req) {
            None => Err(CrateError::Unauthorized),
            Some(token) => authenticate(&self.tokener, &token),
        };
        match user {
            Err(e) => {
                log::debug!("rejecting {}: {}", req.path(), e);
                return Box::pin(async move { Err(CrateError::Unauthorized.into()) });
            }
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
        }

        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let resp = res_fut.await.map_err(|e| e.into())?;
            Ok(resp)
        })
    }
}
