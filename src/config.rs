use std::env;
use std::time::Duration;
use crate::error::AppError;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String,
    pub auth_issuer: String,
    pub access_token_expire_minutes: i64,
    pub sweep_interval: Duration,
    pub admin_email: String,
    pub admin_password_hash: String, // argon2 PHC string
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", 3000)?,
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "event-manager".to_string()),
            access_token_expire_minutes: parsed("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            sweep_interval: Duration::from_secs(parsed("SWEEP_INTERVAL_SECS", 60)?),
            admin_email: required("ADMIN_EMAIL")?,
            admin_password_hash: required("ADMIN_PASSWORD_HASH")?,
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::InternalWithMsg(format!("{} must be set", key)))
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::InternalWithMsg(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}
