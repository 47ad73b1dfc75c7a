use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{PlayerStore, StoreError};
use crate::models::player::{PlayerRecord, PlayerStats};

/// In-process store mirroring the MySQL semantics, for tests.
#[derive(Default)]
pub struct MemoryPlayerStore {
    rows: Mutex<BTreeMap<String, PlayerRecord>>,
    failing: AtomicBool,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.rows.lock().unwrap();
            for row in rows {
                map.insert(row.uid.clone(), row);
            }
        }
        store
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, uid: &str) -> Option<PlayerRecord> {
        self.rows.lock().unwrap().get(uid).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        self.check()?;
        let mut rows: Vec<PlayerRecord> = self.rows.lock().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.uid.cmp(&b.uid)));
        Ok(rows)
    }

    async fn list_uids(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().keys().cloned().collect())
    }

    async fn list_uids_fetched_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.last_fetched.map_or(true, |at| at < cutoff))
            .map(|row| row.uid.clone())
            .collect())
    }

    async fn upsert(&self, stats: &PlayerStats, admin_added: bool) -> Result<(), StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .entry(stats.uid.clone())
            .or_insert_with(|| PlayerRecord::bare(&stats.uid, false));
        row.name = Some(stats.name.clone());
        row.level = Some(stats.level);
        row.exp = Some(stats.exp);
        row.region = Some(stats.region.clone());
        row.likes = Some(stats.likes);
        row.last_update = Some(stats.last_update.clone());
        row.last_fetched = Some(Utc::now());
        if admin_added {
            row.is_admin_added = true;
        }
        Ok(())
    }

    async fn insert_bare(&self, uid: &str, admin_added: bool) -> Result<(), StoreError> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .entry(uid.to_string())
            .or_insert_with(|| PlayerRecord::bare(uid, admin_added));
        Ok(())
    }

    async fn touch_last_fetched(&self, uid: &str) -> Result<(), StoreError> {
        self.check()?;
        if let Some(row) = self.rows.lock().unwrap().get_mut(uid) {
            row.last_fetched = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete(&self, uid: &str) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(uid).map_or(0, |_| 1))
    }
}
