use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::AdminUser;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// Requires a valid `Authorization: Bearer <token>` header.
pub struct AuthUser(pub AdminUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let access_token = parts.headers.get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let user = app_state.auth_service.verify(access_token.trim())?;

        Span::current().record("user", user.email.as_str());

        Ok(AuthUser(user))
    }
}
