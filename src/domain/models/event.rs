use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Ongoing,
    Completed,
    Canceled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Canceled => "canceled",
        }
    }

    /// Terminal states are never touched by the sweep.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventStatus::Completed | EventStatus::Canceled)
    }

    /// Whether a manual update may move an event from `self` to `next`.
    /// Re-submitting the current status is always allowed.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        use EventStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Scheduled, Ongoing) | (Scheduled, Completed) | (Scheduled, Canceled)
                    | (Ongoing, Completed) | (Ongoing, Canceled)
            )
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
    pub status: EventStatus,
}

impl Event {
    /// Status the sweep should assign at `now`. Terminal events keep their status.
    pub fn status_at(&self, now: DateTime<Utc>) -> EventStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        if self.start_time <= now && now <= self.end_time {
            EventStatus::Ongoing
        } else if now > self.end_time {
            EventStatus::Completed
        } else {
            self.status
        }
    }

    pub fn is_open_for_registration(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }

    pub fn has_capacity_for(&self, registered: i64) -> bool {
        registered < i64::from(self.max_attendees)
    }

    pub fn ensure_check_in_window(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if now < self.start_time {
            return Err(AppError::NotStarted);
        }
        if now > self.end_time {
            return Err(AppError::EventOver);
        }
        Ok(())
    }
}

/// Mutable fields of an event, as submitted on create and update.
#[derive(Debug, Clone)]
pub struct EventDetails {
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
}

impl EventDetails {
    pub fn validate_window(&self) -> Result<(), AppError> {
        if self.start_time >= self.end_time {
            return Err(AppError::validation("start_time", "Start time must be before end time"));
        }
        Ok(())
    }

    pub fn into_event(self, id: i64, status: EventStatus) -> Event {
        Event {
            id,
            name: self.name,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            max_attendees: self.max_attendees,
            status,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub event_id: i64,
    pub from: EventStatus,
    pub to: EventStatus,
}
