use std::sync::Arc;
use crate::domain::{
    models::attendee::{Attendee, NewAttendee},
    ports::{AttendeeRepository, Clock, EventRepository},
};
use crate::error::AppError;
use tracing::info;

pub struct RegistrationService {
    attendees: Arc<dyn AttendeeRepository>,
    events: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
}

impl RegistrationService {
    pub fn new(
        attendees: Arc<dyn AttendeeRepository>,
        events: Arc<dyn EventRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { attendees, events, clock }
    }

    pub async fn register(&self, attendee: NewAttendee) -> Result<Attendee, AppError> {
        let created = self.attendees.register(&attendee, self.clock.now()).await?;
        info!("Attendee {} registered for event {}", created.id, created.event_id);
        Ok(created)
    }

    pub async fn check_in(&self, email: &str, event_id: i64) -> Result<Attendee, AppError> {
        let attendee = self.attendees.find_by_email(event_id, email).await?
            .ok_or(AppError::NotFound("Attendee not found or invalid email/event combination".into()))?;

        let event = self.events.find_by_id(attendee.event_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", attendee.event_id)))?;

        event.ensure_check_in_window(self.clock.now())?;

        let checked_in = self.attendees.mark_checked_in(attendee.id).await?;
        info!("Attendee {} checked in to event {}", checked_in.id, event.id);
        Ok(checked_in)
    }

    pub async fn list_attendees(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Event {} not found", event_id)));
        }
        self.attendees.list_by_event(event_id).await
    }
}
