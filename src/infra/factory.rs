use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::Clock;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_attendee_repo::PostgresAttendeeRepo, postgres_event_repo::PostgresEventRepo,
    sqlite_attendee_repo::SqliteAttendeeRepo, sqlite_event_repo::SqliteEventRepo,
};

pub async fn bootstrap_state(config: &Config, clock: Arc<dyn Clock>) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");
        let pool = connect_postgres(database_url).await?;

        Ok(AppState::new(
            config.clone(),
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresAttendeeRepo::new(pool)),
            clock,
        ))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");
        let pool = connect_sqlite(database_url).await?;

        Ok(AppState::new(
            config.clone(),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteAttendeeRepo::new(pool)),
            clock,
        ))
    }
}

pub async fn connect_postgres(database_url: &str) -> Result<PgPool, AppError> {
    let opts = PgConnectOptions::from_str(database_url)?
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await?;

    sqlx::migrate!("./migrations/postgres")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))?;

    Ok(pool)
}

pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))?;

    Ok(pool)
}
