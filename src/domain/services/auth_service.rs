use crate::domain::models::auth::{AdminUser, Claims};
use crate::error::AppError;
use crate::config::Config;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use tracing::warn;

pub struct AuthService {
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret_key.as_bytes());

        Self { config, encoding_key, decoding_key }
    }

    /// Checks the administrator credentials and issues an access token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        if !email.eq_ignore_ascii_case(&self.config.admin_email) {
            return Err(AppError::Unauthorized);
        }

        let parsed_hash = PasswordHash::new(&self.config.admin_password_hash)
            .map_err(|_| AppError::InternalWithMsg("ADMIN_PASSWORD_HASH is not a valid PHC string".into()))?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| {
                warn!("Failed login attempt for {}", email);
                AppError::Unauthorized
            })?;

        self.issue_access_token(&self.config.admin_email)
    }

    pub fn verify(&self, token: &str) -> Result<AdminUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.auth_issuer.as_str()]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(AdminUser { email: token_data.claims.sub })
    }

    fn issue_access_token(&self, subject: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.config.access_token_expire_minutes)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: subject.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })
    }
}
