use super::common::{require_text, text_enum};
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    #[derive(Default)]
    pub enum Role {
        Admin => "ADMIN",
        #[default]
        User => "USER",
    }
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for Profile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Create {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub role: Role,
}

impl Create {
    pub fn validate(&self) -> Result<(), Error> {
        require_text("name", &self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(Error::ValidationError("passwords do not match".into()));
        }
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), Error> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(Error::ValidationError(format!("invalid email: {}", email))),
    }
}

pub fn validate_password(password: &str) -> Result<(), Error> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::ValidationError(format!("password must have at least {} characters", MIN_PASSWORD_LENGTH)));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub role: Role,
}

/// Request body of a user update; `password` is only changed when present.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Default)]
pub struct Patch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub role: Option<Role>,
}
