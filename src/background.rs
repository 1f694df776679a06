use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;
use crate::state::AppState;

/// Advances event statuses on a fixed interval. A failed run commits nothing
/// and the next run re-evaluates every event.
pub async fn start_status_sweeper(state: Arc<AppState>) {
    info!("Starting event status sweeper (every {:?})...", state.config.sweep_interval);

    loop {
        let span = info_span!("status_sweep", run_id = %Uuid::new_v4());

        async {
            match state.event_service.sweep_statuses().await {
                Ok(changes) if !changes.is_empty() => {
                    info!("Status sweep advanced {} event(s)", changes.len());
                }
                Ok(_) => {}
                Err(e) => error!("Status sweep failed: {}", e),
            }
        }
            .instrument(span)
            .await;

        sleep(state.config.sweep_interval).await;
    }
}
