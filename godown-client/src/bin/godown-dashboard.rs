use godown_client::logger::init_logger_with_file;
use godown_client::{AnalyticsPipeline, ClientConfig, DashboardSnapshot, StoreEvent};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = ClientConfig::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(base_url = %config.base_url, "Godown dashboard starting");

    let pipeline = AnalyticsPipeline::from_config(&config)?;
    let mut events = pipeline.store().subscribe();
    let handle = pipeline.start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(StoreEvent::ProjectionUpdated(projection)) => {
                    tracing::debug!(?projection, "Projection updated");
                    let snapshot = DashboardSnapshot::from_state(&pipeline.store().snapshot());
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
                Ok(StoreEvent::FeedFailed(feed)) => {
                    let status = pipeline.store().feed_status(feed);
                    tracing::warn!(feed = %feed, status = ?status, "Feed unavailable");
                }
                Ok(StoreEvent::SnapshotReplaced(_)) => {}
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("Dashboard lagged {n} store events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}
