use crate::domain::{
    models::event::{Event, EventDetails, EventStatus, StatusChange},
    ports::EventRepository,
};
use crate::error::AppError;
use crate::infra::repositories::{map_foreign_key_violation, ATTENDEES_REGISTERED};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, details: &EventDetails) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                name, description, start_time, end_time, location, max_attendees, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
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
                name=$1, description=$2, start_time=$3, end_time=$4,
                location=$5, max_attendees=$6, status=$7
               WHERE id=$8 AND status=$9 RETURNING *"#
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
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let registered = sqlx::query("SELECT COUNT(*) as count FROM attendees WHERE event_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get::<i64, _>("count");

        if registered > 0 {
            return Err(AppError::Conflict(ATTENDEES_REGISTERED.into()));
        }

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_foreign_key_violation)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(event)
    }

    async fn sweep_statuses(&self, now: DateTime<Utc>) -> Result<Vec<StatusChange>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let active = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status NOT IN ('completed', 'canceled') ORDER BY id FOR UPDATE"
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
            sqlx::query("UPDATE events SET status = $1 WHERE id = $2")
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
