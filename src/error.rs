use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid input for '{field}': {message}")]
    Validation { field: String, message: String },
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Event capacity reached")]
    CapacityExceeded,
    #[error("You are already registered for this event")]
    DuplicateRegistration,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Event has not started yet")]
    NotStarted,
    #[error("Event is over")]
    EventOver,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation { field: field.into(), message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::CapacityExceeded
            | AppError::DuplicateRegistration
            | AppError::Conflict(_)
            | AppError::NotStarted
            | AppError::EventOver => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::CapacityExceeded => "CAPACITY_EXCEEDED",
            AppError::DuplicateRegistration => "DUPLICATE_REGISTRATION",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotStarted => "NOT_STARTED",
            AppError::EventOver => "EVENT_OVER",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => {
                "INTERNAL_ERROR"
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let body = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                json!({ "error": "Internal server error", "code": code })
            }
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                json!({ "error": "Internal error", "code": code })
            }
            AppError::Validation { field, message } => {
                json!({ "error": message, "field": field, "code": code })
            }
            AppError::NotFound(msg) | AppError::Conflict(msg) => {
                json!({ "error": msg, "code": code })
            }
            other => json!({ "error": other.to_string(), "code": code }),
        };

        if matches!(self, AppError::Unauthorized) {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}
