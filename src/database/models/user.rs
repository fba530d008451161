use super::stored;
use crate::core::models::user::User;
use crate::error::Error;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            role: stored("user role", &row.role)?,
            name: row.name,
            email: row.email,
            password: row.password,
            salt: row.salt,
            created_at: row.created_at,
        })
    }
}
