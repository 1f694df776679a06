use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use crate::api::dtos::responses::{HealthResponse, MessageResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(MessageResponse { message: "Welcome to the Event Management API".to_string() })
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    state.event_repo.ping().await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
