use std::sync::Arc;
use crate::domain::{
    models::event::{Event, EventDetails, EventStatus, StatusChange},
    ports::{Clock, EventRepository},
};
use crate::error::AppError;
use tracing::{debug, info};

const UPDATE_ATTEMPTS: usize = 3;

/// Event lifecycle: CRUD plus the periodic status sweep.
pub struct EventService {
    repo: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn create(&self, details: EventDetails) -> Result<Event, AppError> {
        details.validate_window()?;
        if details.start_time <= self.clock.now() {
            return Err(AppError::validation("start_time", "Start time must be in the future"));
        }

        let event = self.repo.create(&details).await?;
        info!("Event created: {} ({})", event.id, event.name);
        Ok(event)
    }

    pub async fn list(&self) -> Result<Vec<Event>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Event, AppError> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Replaces every mutable field. An omitted status keeps the current one;
    /// a supplied status must be reachable from the current one. The write is
    /// conditional on the status read, so a concurrent sweep forces a re-check.
    pub async fn update(&self, id: i64, details: EventDetails, status: Option<EventStatus>) -> Result<Event, AppError> {
        details.validate_window()?;

        for attempt in 1..=UPDATE_ATTEMPTS {
            let current = self.get(id).await?;

            let next = status.unwrap_or(current.status);
            if !current.status.can_transition_to(next) {
                return Err(AppError::validation(
                    "status",
                    format!("Cannot change status from {} to {}", current.status, next),
                ));
            }

            let candidate = details.clone().into_event(id, next);
            if let Some(updated) = self.repo.update_if_status(&candidate, current.status).await? {
                info!("Event updated: {}", id);
                return Ok(updated);
            }
            debug!("Event {} changed during update (attempt {}), re-reading", id, attempt);
        }

        Err(AppError::Conflict(format!("Event {} is changing too quickly to update, try again", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<Event, AppError> {
        let deleted = self.repo.delete_if_unreferenced(id).await?;
        info!("Event deleted: {}", id);
        Ok(deleted)
    }

    pub async fn sweep_statuses(&self) -> Result<Vec<StatusChange>, AppError> {
        let now = self.clock.now();
        let changes = self.repo.sweep_statuses(now).await?;

        for change in &changes {
            info!(event_id = change.event_id, from = %change.from, to = %change.to, "Event status advanced");
        }
        debug!("Status sweep at {} applied {} change(s)", now, changes.len());
        Ok(changes)
    }
}
