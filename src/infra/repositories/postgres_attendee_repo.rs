use crate::domain::{
    models::{attendee::{Attendee, NewAttendee}, event::Event},
    ports::AttendeeRepository,
};
use crate::error::AppError;
use crate::infra::repositories::map_unique_violation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresAttendeeRepo {
    pool: PgPool,
}

impl PostgresAttendeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendeeRepository for PostgresAttendeeRepo {
    async fn register(&self, attendee: &NewAttendee, now: DateTime<Utc>) -> Result<Attendee, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock serialises registrations for the same event until commit.
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(attendee.event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .filter(|e| e.is_open_for_registration(now))
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let registered = sqlx::query("SELECT COUNT(*) as count FROM attendees WHERE event_id = $1")
            .bind(event.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get::<i64, _>("count");

        if !event.has_capacity_for(registered) {
            return Err(AppError::CapacityExceeded);
        }

        let existing = sqlx::query("SELECT id FROM attendees WHERE event_id = $1 AND email = $2")
            .bind(event.id)
            .bind(&attendee.email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if existing.is_some() {
            return Err(AppError::DuplicateRegistration);
        }

        let created = sqlx::query_as::<_, Attendee>(
            r#"INSERT INTO attendees (first_name, last_name, email, phone_number, check_in_status, event_id)
               VALUES ($1, $2, $3, $4, FALSE, $5)
               RETURNING *"#
        )
            .bind(&attendee.first_name)
            .bind(&attendee.last_name)
            .bind(&attendee.email)
            .bind(&attendee.phone_number)
            .bind(event.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_unique_violation)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_email(&self, event_id: i64, email: &str) -> Result<Option<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE event_id = $1 AND email = $2")
            .bind(event_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: i64) -> Result<Vec<Attendee>, AppError> {
        sqlx::query_as::<_, Attendee>("SELECT * FROM attendees WHERE event_id = $1 ORDER BY id ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_checked_in(&self, id: i64) -> Result<Attendee, AppError> {
        sqlx::query_as::<_, Attendee>("UPDATE attendees SET check_in_status = TRUE WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Attendee not found".into()))
    }
}
