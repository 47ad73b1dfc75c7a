use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::services::sync::SyncService;

pub async fn start_sync_scheduler(sync: Arc<SyncService>, period: Duration) {
    tracing::info!("Background Task Started: player sync every {}s", period.as_secs());
    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        run_scheduled_sweep(&sync).await;
    }
}

async fn run_scheduled_sweep(sync: &SyncService) {
    match sync.try_sync_all().await {
        Ok(Some(summary)) => {
            tracing::debug!("Scheduled sweep covered {} players", summary.total);
        }
        Ok(None) => tracing::warn!("Previous sweep still running, skipping this tick"),
        Err(e) => tracing::error!("Background Task Error: {}", e),
    }
}
