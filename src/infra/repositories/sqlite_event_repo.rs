use crate::domain::{
    models::event::{Event, EventDetails, EventStatus, StatusChange},
    ports::EventRepository,
};
use crate::error::AppError;
use crate::infra::repositories::{map_foreign_key_violation, ATTENDEES_REGISTERED};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, details: &EventDetails) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                name, description, start_time, end_time, location, max_attendees, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&details.name)
            .bind(&details.description)
            .bind(details.start_time)
            .bind(details.end_time)
            .bind(&details.location)
            .bind(details.max_attendees)
            .bind(EventStatus::Scheduled)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY start_time ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_if_status(&self, event: &Event, expected: EventStatus) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                name=?, description=?, start_time=?, end_time=?,
                location=?, max_attendees=?, status=?
               WHERE id=? AND status=? RETURNING *"#
        )
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(&event.location)
            .bind(event.max_attendees)
            .bind(event.status)
            .bind(event.id)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_if_unreferenced(&self, id: i64) -> Result<Event, AppError> {
        // One statement, so the attendee check and the delete share SQLite's write lock.
        let deleted = sqlx::query_as::<_, Event>(
            r#"DELETE FROM events
               WHERE id = ? AND NOT EXISTS (SELECT 1 FROM attendees WHERE event_id = ?)
               RETURNING *"#
        )
            .bind(id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_foreign_key_violation)?;

        if let Some(event) = deleted {
            return Ok(event);
        }

        match self.find_by_id(id).await? {
            Some(_) => Err(AppError::Conflict(ATTENDEES_REGISTERED.into())),
            None => Err(AppError::NotFound("Event not found".into())),
        }
    }

    async fn sweep_statuses(&self, now: DateTime<Utc>) -> Result<Vec<StatusChange>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let active = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status NOT IN ('completed', 'canceled')"
        )
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let mut changes = Vec::new();
        for event in active {
            let next = event.status_at(now);
            if next == event.status {
                continue;
            }
            sqlx::query("UPDATE events SET status = ? WHERE id = ?")
                .bind(next)
                .bind(event.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            changes.push(StatusChange { event_id: event.id, from: event.status, to: next });
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(changes)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
