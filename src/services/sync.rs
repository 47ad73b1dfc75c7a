use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;

use crate::models::player::PlayerStats;
use crate::services::player_api::{FetchError, PlayerSource};
use crate::store::{PlayerStore, StoreError};

/// Upper bound on concurrent upstream fetches.
pub const BATCH_SIZE: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("player {0} not found")]
    NotFound(String),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub total: usize,
    pub updated: usize,
    pub not_found: usize,
    pub failed: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdminAddSummary {
    pub fetched: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Updated,
    NotFound,
    Failed,
}

pub struct SyncService {
    store: Arc<dyn PlayerStore>,
    source: Arc<dyn PlayerSource>,
    min_refetch: Duration,
    sweep_lock: Mutex<()>,
}

impl SyncService {
    pub fn new(store: Arc<dyn PlayerStore>, source: Arc<dyn PlayerSource>, min_refetch: Duration) -> Self {
        Self {
            store,
            source,
            min_refetch,
            sweep_lock: Mutex::new(()),
        }
    }

    /// Fetch one uid upstream. A definitive not-found refreshes the row's freshness
    /// marker; a transient failure leaves storage untouched.
    pub async fn fetch(&self, uid: &str) -> Result<Option<PlayerStats>, FetchError> {
        match self.source.fetch_player(uid).await {
            Ok(Some(stats)) => Ok(Some(stats)),
            Ok(None) => {
                tracing::info!(uid = %uid, "player not found upstream");
                if let Err(e) = self.store.touch_last_fetched(uid).await {
                    tracing::error!(uid = %uid, "failed to touch last_fetched: {}", e);
                }
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(uid = %uid, "fetch failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn sync_one(&self, uid: &str) -> Result<PlayerStats, SyncError> {
        match self.fetch(uid).await? {
            Some(stats) => {
                self.store.upsert(&stats, false).await?;
                Ok(stats)
            }
            None => Err(SyncError::NotFound(uid.to_string())),
        }
    }

    /// Sweep every tracked uid. Waits for any running sweep to finish first.
    pub async fn sync_all(&self) -> Result<SweepSummary, StoreError> {
        let _guard = self.sweep_lock.lock().await;
        let uids = self.store.list_uids().await?;
        Ok(self.run_sweep(&uids).await)
    }

    /// Scheduled sweep. Returns `None` without doing anything when a sweep is
    /// already in progress.
    pub async fn try_sync_all(&self) -> Result<Option<SweepSummary>, StoreError> {
        let Ok(_guard) = self.sweep_lock.try_lock() else {
            return Ok(None);
        };

        let uids = if self.min_refetch.is_zero() {
            self.store.list_uids().await?
        } else {
            let cutoff = chrono::Duration::from_std(self.min_refetch)
                .ok()
                .and_then(|window| chrono::Utc::now().checked_sub_signed(window))
                .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
            self.store.list_uids_fetched_before(cutoff).await?
        };

        Ok(Some(self.run_sweep(&uids).await))
    }

    async fn run_sweep(&self, uids: &[String]) -> SweepSummary {
        let mut summary = SweepSummary {
            total: uids.len(),
            ..Default::default()
        };

        for batch in uids.chunks(BATCH_SIZE) {
            let outcomes = join_all(batch.iter().map(|uid| self.sync_member(uid))).await;
            for outcome in outcomes {
                match outcome {
                    Outcome::Updated => summary.updated += 1,
                    Outcome::NotFound => summary.not_found += 1,
                    Outcome::Failed => summary.failed += 1,
                }
            }
        }

        tracing::info!(
            total = summary.total,
            updated = summary.updated,
            not_found = summary.not_found,
            failed = summary.failed,
            "sweep finished"
        );
        summary
    }

    async fn sync_member(&self, uid: &str) -> Outcome {
        match self.sync_one(uid).await {
            Ok(_) => Outcome::Updated,
            Err(SyncError::NotFound(_)) => Outcome::NotFound,
            Err(SyncError::Fetch(_)) => Outcome::Failed,
            Err(SyncError::Store(e)) => {
                tracing::error!(uid = %uid, "failed to store player: {}", e);
                Outcome::Failed
            }
        }
    }

    /// Track `uids` as admin-added. Ids the upstream can't serve right now are
    /// still tracked as bare rows so later sweeps pick them up.
    pub async fn admin_add(&self, uids: &[String]) -> Result<AdminAddSummary, StoreError> {
        let mut summary = AdminAddSummary::default();
        let mut first_err = None;

        for batch in uids.chunks(BATCH_SIZE) {
            let results = join_all(batch.iter().map(|uid| self.admin_add_one(uid))).await;
            for (uid, result) in batch.iter().zip(results) {
                match result {
                    Ok(true) => summary.fetched += 1,
                    Ok(false) => summary.pending += 1,
                    Err(e) => {
                        tracing::error!(uid = %uid, "admin add failed: {}", e);
                        first_err.get_or_insert(e);
                    }
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    async fn admin_add_one(&self, uid: &str) -> Result<bool, StoreError> {
        match self.fetch(uid).await {
            Ok(Some(stats)) => {
                self.store.upsert(&stats, true).await?;
                Ok(true)
            }
            Ok(None) | Err(_) => {
                self.store.insert_bare(uid, true).await?;
                tracing::info!(uid = %uid, "tracking player without stats");
                Ok(false)
            }
        }
    }
}
