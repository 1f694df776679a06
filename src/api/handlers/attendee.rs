use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated::ValidatedJson;
use crate::api::dtos::requests::{CheckInRequest, RegisterAttendeeRequest};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn register_attendee(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterAttendeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("register_attendee: event {}", payload.event_id);
    let attendee = state.registration_service.register(payload.into()).await?;
    Ok(Json(attendee))
}

pub async fn check_in_attendee(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CheckInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attendee = state.registration_service.check_in(&payload.email, payload.event_id).await?;
    Ok(Json(attendee))
}
