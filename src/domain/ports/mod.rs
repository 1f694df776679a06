use crate::domain::models::{
    attendee::{Attendee, NewAttendee},
    event::{Event, EventDetails, EventStatus, StatusChange},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the current time. Injected so tests can move the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, details: &EventDetails) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;

    /// Writes `event` only while the stored status still equals `expected`.
    /// `None` when the row is gone or its status moved on.
    async fn update_if_status(&self, event: &Event, expected: EventStatus) -> Result<Option<Event>, AppError>;

    /// Deletes the event unless attendees reference it.
    /// `NotFound` when absent, `Conflict` when attendees exist.
    async fn delete_if_unreferenced(&self, id: i64) -> Result<Event, AppError>;

    /// Applies `Event::status_at(now)` to every non-terminal event in one
    /// transaction and returns the changes that were written.
    async fn sweep_statuses(&self, now: DateTime<Utc>) -> Result<Vec<StatusChange>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Registers atomically with respect to capacity, checking in order:
    /// event exists and starts after `now` (`NotFound`), capacity
    /// (`CapacityExceeded`), then (event_id, email) uniqueness
    /// (`DuplicateRegistration`).
    async fn register(&self, attendee: &NewAttendee, now: DateTime<Utc>) -> Result<Attendee, AppError>;
    async fn find_by_email(&self, event_id: i64, email: &str) -> Result<Option<Attendee>, AppError>;
    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError>;
    async fn mark_checked_in(&self, id: i64) -> Result<Attendee, AppError>;
}
