use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use super::{PlayerStore, StoreError};
use crate::models::player::{PlayerRecord, PlayerStats};

// Row alias form needs MySQL 8.0.19+; `VALUES(col)` in the update clause is deprecated.
const UPSERT_SYNC: &str = "INSERT INTO players (uid, name, level, exp, region, likes, last_update, last_fetched, is_admin_added) \
     VALUES (?, ?, ?, ?, ?, ?, ?, NOW(), FALSE) AS new \
     ON DUPLICATE KEY UPDATE name = new.name, level = new.level, exp = new.exp, \
     region = new.region, likes = new.likes, last_update = new.last_update, last_fetched = NOW()";

const UPSERT_ADMIN: &str = "INSERT INTO players (uid, name, level, exp, region, likes, last_update, last_fetched, is_admin_added) \
     VALUES (?, ?, ?, ?, ?, ?, ?, NOW(), TRUE) AS new \
     ON DUPLICATE KEY UPDATE name = new.name, level = new.level, exp = new.exp, \
     region = new.region, likes = new.likes, last_update = new.last_update, last_fetched = NOW(), \
     is_admin_added = TRUE";

#[derive(Clone)]
pub struct MySqlPlayerStore {
    pool: MySqlPool,
}

impl MySqlPlayerStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerStore for MySqlPlayerStore {
    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        // MySQL sorts NULL lowest, so unfetched rows land at the end.
        let rows = sqlx::query_as::<_, PlayerRecord>(
            "SELECT uid, name, level, exp, region, likes, last_update, last_fetched, is_admin_added \
             FROM players ORDER BY level DESC, uid ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_uids(&self) -> Result<Vec<String>, StoreError> {
        let uids = sqlx::query_scalar::<_, String>("SELECT uid FROM players ORDER BY uid ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(uids)
    }

    async fn list_uids_fetched_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StoreError> {
        let uids = sqlx::query_scalar::<_, String>(
            "SELECT uid FROM players WHERE last_fetched IS NULL OR last_fetched < ? ORDER BY uid ASC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(uids)
    }

    async fn upsert(&self, stats: &PlayerStats, admin_added: bool) -> Result<(), StoreError> {
        let sql = if admin_added { UPSERT_ADMIN } else { UPSERT_SYNC };
        sqlx::query(sql)
            .bind(&stats.uid)
            .bind(&stats.name)
            .bind(stats.level)
            .bind(stats.exp)
            .bind(&stats.region)
            .bind(stats.likes)
            .bind(&stats.last_update)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_bare(&self, uid: &str, admin_added: bool) -> Result<(), StoreError> {
        // Only the key conflict is absorbed; truncation and other data errors still surface.
        sqlx::query(
            "INSERT INTO players (uid, is_admin_added) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE uid = uid",
        )
        .bind(uid)
        .bind(admin_added)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn touch_last_fetched(&self, uid: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE players SET last_fetched = NOW() WHERE uid = ?")
            .bind(uid)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, uid: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM players WHERE uid = ?")
            .bind(uid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
