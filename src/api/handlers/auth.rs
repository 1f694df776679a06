use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::LoginRequest;
use crate::api::extractors::validated::ValidatedJson;
use crate::domain::models::auth::TokenResponse;
use std::sync::Arc;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let access_token = state.auth_service.login(&payload.email, &payload.password)?;

    info!("Administrator logged in: {}", payload.email);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
