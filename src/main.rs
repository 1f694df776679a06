use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(e) = event_manager::run().await {
        error!("Fatal: {}", e);
        eprintln!("event-manager failed to start: {}", e);
        std::process::exit(1);
    }
}
