pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;
pub mod background;

use crate::config::Config;
use crate::error::AppError;
use crate::infra::{clock::SystemClock, factory::bootstrap_state};
use api::router::create_router;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use crate::background::start_status_sweeper;

const LOG_DIR: &str = "./logs";

/// Human-readable lines on stdout (`RUST_LOG`, default `info`) plus a daily JSON file.
/// File records carry the enclosing span, so HTTP lines keep their `request_id`
/// and sweep lines their `run_id`.
pub fn init_logging() -> WorkerGuard {
    let (file_writer, guard) = tracing_appender::non_blocking(
        tracing_appender::rolling::daily(LOG_DIR, "event-manager.log"),
    );

    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("info,event_manager=debug"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!(log_dir = LOG_DIR, "event-manager logging ready");
    guard
}

pub async fn run() -> Result<(), AppError> {
    let _guard = init_logging();

    let config = Config::from_env()?;
    let state = bootstrap_state(&config, Arc::new(SystemClock)).await?;
    let state_arc = Arc::new(state);

    let worker_state = state_arc.clone();
    tokio::spawn(async move {
        start_status_sweeper(worker_state).await;
    });

    let app = create_router(state_arc);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to bind port {}: {}", config.port, e)))?;

    info!(port = config.port, "event-manager listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Server error: {}", e)))
}
