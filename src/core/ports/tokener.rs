use crate::core::models::user::Role;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Claims carried by an access token: who the caller is and what they may do.
pub trait Payload: Serialize + for<'d> Deserialize<'d> {
    fn user(&self) -> &str;
    fn role(&self) -> Role;
}

pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}
