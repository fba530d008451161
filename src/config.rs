use crate::core::aggregation::GroupKey;
use crate::error::Error;

pub static DATABASE_URL: &str = "DATABASE_URL";
pub static JWT_SECRET: &str = "JWT_SECRET";
pub static BIND_ADDRESS: &str = "BIND_ADDRESS";
pub static DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
pub static GROUP_BY: &str = "GROUP_BY";
pub static ADMIN_EMAIL: &str = "ADMIN_EMAIL";
pub static ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: Vec<u8>,
    pub bind_address: String,
    pub max_connections: u32,
    pub group_by: GroupKey,
    /// Seeded as an administrator at start-up when both are set.
    pub admin: Option<(String, String)>,
}

fn required(key: &str) -> Result<String, Error> {
    dotenv::var(key).map_err(|_| Error::ServerError(format!("environment variable {} not been set", key)))
}

impl Config {
    /// Reads the process environment, after `.env` has been loaded.
    pub fn from_env() -> Result<Self, Error> {
        let max_connections = match dotenv::var(DB_MAX_CONNECTIONS) {
            Ok(v) => v.parse().map_err(|_| Error::ServerError(format!("invalid {}: {}", DB_MAX_CONNECTIONS, v)))?,
            Err(_) => 5,
        };
        let group_by = match dotenv::var(GROUP_BY) {
            Ok(v) => v.parse()?,
            Err(_) => GroupKey::default(),
        };
        Ok(Self {
            database_url: required(DATABASE_URL)?,
            jwt_secret: required(JWT_SECRET)?.into_bytes(),
            bind_address: dotenv::var(BIND_ADDRESS).unwrap_or_else(|_| "0.0.0.0:8000".into()),
            max_connections,
            group_by,
            admin: dotenv::var(ADMIN_EMAIL).ok().zip(dotenv::var(ADMIN_PASSWORD).ok()),
        })
    }
}
