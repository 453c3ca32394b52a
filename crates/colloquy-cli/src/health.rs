use colloquy_stream::StreamingClient;
use colloquy_types::HealthStatus;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Poll the backend health and log every status transition
pub fn spawn_health_poller(client: StreamingClient, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        let mut last: Option<HealthStatus> = None;

        loop {
            ticker.tick().await;
            let report = client.health().await;

            if last == Some(report.status) {
                tracing::debug!(status = ?report.status, "Backend health unchanged");
                continue;
            }

            match report.status {
                HealthStatus::Ok => {
                    tracing::info!(version = %report.version, "Backend healthy");
                }
                HealthStatus::Degraded => {
                    tracing::warn!(
                        database = %report.database,
                        checkpointer = %report.checkpointer,
                        "Backend degraded"
                    );
                }
                HealthStatus::Down => {
                    tracing::error!("Backend unavailable");
                }
            }
            last = Some(report.status);
        }
    })
}
