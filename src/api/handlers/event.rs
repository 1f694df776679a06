use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, validated::ValidatedJson};
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("Creating event '{}' by {}", payload.name, user.email);
    let created = state.event_service.create(payload.into()).await?;
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_service.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.get(event_id).await?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(event_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (details, status) = payload.into_parts();
    let updated = state.event_service.update(event_id, details, status).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.event_service.delete(event_id).await?;
    Ok(Json(deleted))
}

pub async fn list_attendees(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attendees = state.registration_service.list_attendees(event_id).await?;
    Ok(Json(attendees))
}
