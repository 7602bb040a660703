use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::JobRegistry;

/// Shortest sweep period; smaller intervals are raised to this.
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically evicts jobs older than `ttl` until `cancel` fires.
///
/// The first sweep happens one `interval` after start.
pub async fn run_cleanup(
    registry: Arc<JobRegistry>,
    ttl: Duration,
    interval: Duration,
    cancel: CancellationToken,
) {
    let interval = interval.max(MIN_CLEANUP_INTERVAL);
    engine_info!(
        "Cleanup started ttl_secs={} interval_secs={}",
        ttl.as_secs(),
        interval.as_secs()
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                engine_info!("Cleanup stopping");
                break;
            }
            _ = ticker.tick() => {
                sweep_expired(&registry, ttl);
            }
        }
    }
}

/// One eviction pass. Returns the number of jobs removed.
pub fn sweep_expired(registry: &JobRegistry, ttl: Duration) -> usize {
    let Some(cutoff) = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| registry.now().checked_sub_signed(ttl))
    else {
        return 0;
    };

    let evicted = registry.evict_created_before(cutoff);
    if evicted.is_empty() {
        engine_debug!("Cleanup: nothing to evict");
    } else {
        for job_id in &evicted {
            engine_debug!("Cleanup: evicted job {}", job_id);
        }
        engine_info!("Cleanup: evicted {} expired job(s)", evicted.len());
    }
    evicted.len()
}
