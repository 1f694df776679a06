use crate::domain::{
    models::{attendee::{Attendee, NewAttendee}, event::Event},
    ports::AttendeeRepository,
};
use crate::error::AppError;
use crate::infra::repositories::map_unique_violation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteAttendeeRepo {
    pool: SqlitePool,
}

impl SqliteAttendeeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_event(&self, event_id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

/// Why the guarded insert wrote nothing, judged against the event as it is now.
fn insert_rejection(event: Option<&Event>, now: DateTime<Utc>) -> AppError {
    match event {
        Some(event) if event.is_open_for_registration(now) => AppError::CapacityExceeded,
        _ => AppError::NotFound("Event not found".into()),
    }
}

#[async_trait]
impl AttendeeRepository for SqliteAttendeeRepo {
    async fn register(&self, attendee: &NewAttendee, now: DateTime<Utc>) -> Result<Attendee, AppError> {
        let event = self.find_event(attendee.event_id)
            .await?
            .filter(|e| e.is_open_for_registration(now))
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let registered = sqlx::query("SELECT COUNT(*) as count FROM attendees WHERE event_id = ?")
            .bind(event.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?
            .get::<i64, _>("count");

        if !event.has_capacity_for(registered) {
            return Err(AppError::CapacityExceeded);
        }

        if self.find_by_email(event.id, &attendee.email).await?.is_some() {
            return Err(AppError::DuplicateRegistration);
        }

        // Single statement so SQLite's writer lock makes the capacity check and
        // the insert atomic; the checks above only pick the error to report.
        let inserted = sqlx::query_as::<_, Attendee>(
            r#"INSERT INTO attendees (first_name, last_name, email, phone_number, check_in_status, event_id)
               SELECT ?, ?, ?, ?, 0, ?
               WHERE (SELECT COUNT(*) FROM attendees WHERE event_id = ?)
                   < (SELECT max_attendees FROM events WHERE id = ?)
               RETURNING *"#
        )
            .bind(&attendee.first_name)
            .bind(&attendee.last_name)
            .bind(&attendee.email)
            .bind(&attendee.phone_number)
            .bind(event.id)
            .bind(event.id)
            .bind(event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        match inserted {
            Some(created) => Ok(created),
            None => {
                // The event may have been deleted since the checks above.
                let current = self.find_event(event.id).await?;
                Err(insert_rejection(current.as_ref(), now))
            }
        }
    }

    async fn find_by_email(&self, event_id: i64, email: &str) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE event_id = ? AND email = ?")
            .bind(event_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE event_id = ? ORDER BY id ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_checked_in(&self, id: i64) -> Result<Attendee, AppError> {
        sqlx::query_as::<_, Attendee>("UPDATE attendees SET check_in_status = ? WHERE id = ? RETURNING *")
            .bind(true)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Attendee not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::{EventDetails, EventStatus};
    use chrono::Duration;

    fn upcoming(now: DateTime<Utc>) -> Event {
        EventDetails {
            name: "Meetup".into(),
            description: None,
            start_time: now + Duration::hours(1),
            end_time: now + Duration::hours(2),
            location: "Room 1".into(),
            max_attendees: 1,
        }
        .into_event(7, EventStatus::Scheduled)
    }

    #[test]
    fn test_rejected_insert_for_vanished_event_is_not_found() {
        let now = Utc::now();
        assert!(matches!(insert_rejection(None, now), AppError::NotFound(_)));

        let event = upcoming(now);
        assert!(matches!(insert_rejection(Some(&event), event.start_time), AppError::NotFound(_)));
    }

    #[test]
    fn test_rejected_insert_for_open_event_is_capacity() {
        let now = Utc::now();
        let event = upcoming(now);
        assert!(matches!(insert_rejection(Some(&event), now), AppError::CapacityExceeded));
    }
}
