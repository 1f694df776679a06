pub mod sqlite_attendee_repo;
pub mod sqlite_event_repo;

pub mod postgres_attendee_repo;
pub mod postgres_event_repo;

use crate::error::AppError;

pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        let code = db_err.code().unwrap_or_default();

        // 2067 = SQLite Unique Constraint
        // 23505 = PostgreSQL Unique Violation
        if code == "2067" || code == "23505" {
            return AppError::DuplicateRegistration;
        }
    }
    AppError::Database(e)
}

/// An attendee row that still points at the event turns a delete into a conflict.
pub(crate) fn map_foreign_key_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        let code = db_err.code().unwrap_or_default();

        // 787 = SQLite Foreign Key Constraint
        // 23503 = PostgreSQL Foreign Key Violation
        if code == "787" || code == "23503" {
            return AppError::Conflict(ATTENDEES_REGISTERED.into());
        }
    }
    AppError::Database(e)
}

pub(crate) const ATTENDEES_REGISTERED: &str =
    "Attendees already registered for this event, so it can't be deleted";
