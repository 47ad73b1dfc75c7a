use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

/// A tracked account row as stored in `players`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct PlayerRecord {
    pub uid: String,
    pub name: Option<String>,
    pub level: Option<i32>,
    pub exp: Option<i64>,
    pub region: Option<String>,
    pub likes: Option<i64>,
    pub last_update: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub is_admin_added: bool,
}

#[cfg(test)]
impl PlayerRecord {
    /// Row with no stats yet, as left by an insert-if-absent.
    pub fn bare(uid: &str, admin_added: bool) -> Self {
        Self {
            uid: uid.to_string(),
            name: None,
            level: None,
            exp: None,
            region: None,
            likes: None,
            last_update: None,
            last_fetched: None,
            is_admin_added: admin_added,
        }
    }
}

/// Stats mapped from a successful upstream fetch. Every field is populated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct PlayerStats {
    pub uid: String,
    pub name: String,
    pub level: i32,
    pub exp: i64,
    pub region: String,
    pub likes: i64,
    pub last_update: String,
}

/// Width of the `players.uid` column.
pub const MAX_UID_LEN: usize = 32;

/// Trim `raw` and check it fits the `uid` column as plain ASCII alphanumerics.
pub fn validate_uid(raw: &str) -> Result<&str, String> {
    let uid = raw.trim();
    if uid.is_empty() {
        return Err("uid is required".to_string());
    }
    if uid.len() > MAX_UID_LEN {
        return Err(format!("uid must be at most {} characters", MAX_UID_LEN));
    }
    if !uid.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err("uid must contain only letters and digits".to_string());
    }
    Ok(uid)
}

/// `uids` accepts either a single id or a list of ids.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UidList {
    One(String),
    Many(Vec<String>),
}

impl UidList {
    /// Validated ids in request order, blanks and duplicates removed.
    pub fn normalized(self) -> Result<Vec<String>, String> {
        let raw = match self {
            UidList::One(uid) => vec![uid],
            UidList::Many(uids) => uids,
        };

        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for uid in raw {
            if uid.trim().is_empty() {
                continue;
            }
            let uid = validate_uid(&uid)?;
            if !out.iter().any(|u| u == uid) {
                out.push(uid.to_string());
            }
        }

        if out.is_empty() {
            return Err("uids is required".to_string());
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminAddPlayersRequest {
    pub uids: UidList,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeletePlayerRequest {
    pub uid: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SyncOneResponse {
    pub message: String,
    pub data: PlayerStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminAddResponse {
    pub message: String,
    /// Ids stored with fresh stats.
    pub fetched: usize,
    /// Ids tracked without stats, picked up by later sweeps.
    pub pending: usize,
}
