use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::player::{PlayerRecord, PlayerStats};

pub mod mysql;
#[cfg(test)]
pub mod memory;

pub use mysql::MySqlPlayerStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[cfg(test)]
    #[error("store unavailable")]
    Unavailable,
}

/// Keyed persistence for tracked players.
///
/// Implementations must tolerate concurrent calls for disjoint uids; calls for the
/// same uid resolve last-write-wins.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Every row, highest level first, rows without a level last.
    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StoreError>;

    async fn list_uids(&self) -> Result<Vec<String>, StoreError>;

    /// Uids never fetched, or last fetched strictly before `cutoff`.
    async fn list_uids_fetched_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError>;

    /// Insert or overwrite every mutable attribute and refresh `last_fetched`.
    /// `is_admin_added` is only ever raised, never cleared.
    async fn upsert(&self, stats: &PlayerStats, admin_added: bool) -> Result<(), StoreError>;

    /// Insert-if-absent; an existing row is left exactly as it was.
    async fn insert_bare(&self, uid: &str, admin_added: bool) -> Result<(), StoreError>;

    /// Refresh `last_fetched` on an existing row; no-op when the row is missing.
    async fn touch_last_fetched(&self, uid: &str) -> Result<(), StoreError>;

    /// Number of rows removed.
    async fn delete(&self, uid: &str) -> Result<u64, StoreError>;
}
