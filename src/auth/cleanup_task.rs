use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument, warn};

use super::provider::SessionAuthProvider;

const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Starts the background task that periodically evicts expired sessions
#[instrument(skip(provider))]
pub async fn start_cleanup_task(provider: Arc<SessionAuthProvider>, cleanup_interval: Duration) {
    // tokio's interval panics on a zero period
    let cleanup_interval = if cleanup_interval.is_zero() {
        warn!("Zero cleanup interval requested, using {:?}", MIN_CLEANUP_INTERVAL);
        MIN_CLEANUP_INTERVAL
    } else {
        cleanup_interval
    };

    info!(
        cleanup_interval_secs = cleanup_interval.as_secs(),
        "Starting session cleanup background task"
    );

    let mut ticker = interval(cleanup_interval);
    // The first tick completes immediately; restore already purged on startup
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match provider.cleanup_expired_sessions().await {
            Ok(removed) => {
                info!(
                    removed_sessions = removed,
                    active_sessions = provider.cached_sessions(),
                    "Session cleanup completed"
                );
            }
            Err(e) => {
                error!(error = %e, "Session cleanup task failed");
            }
        }
    }
}
