use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::models::player::PlayerStats;

const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Upstream lookup of a single player.
///
/// `Ok(None)` is a definitive not-found; `Err` is anything worth retrying later.
#[async_trait]
pub trait PlayerSource: Send + Sync {
    async fn fetch_player(&self, uid: &str) -> Result<Option<PlayerStats>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct PlayerInfoResponse {
    status: Option<String>,
    data: Option<PlayerInfoData>,
}

#[derive(Debug, Deserialize)]
struct PlayerInfoData {
    #[serde(rename = "basicInfo")]
    basic_info: Option<BasicInfo>,
}

#[derive(Debug, Deserialize)]
struct BasicInfo {
    nickname: String,
    level: i32,
    #[serde(default)]
    exp: i64,
    region: String,
    #[serde(default)]
    liked: i64,
}

pub struct PlayerApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlayerApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PlayerSource for PlayerApiClient {
    async fn fetch_player(&self, uid: &str) -> Result<Option<PlayerStats>, FetchError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("uid", uid)])
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(FetchError::Status(status.as_u16())),
            _ => {}
        }

        let body = resp.text().await?;
        let parsed: PlayerInfoResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        map_response(uid, parsed).map(Some)
    }
}

fn map_response(uid: &str, resp: PlayerInfoResponse) -> Result<PlayerStats, FetchError> {
    match resp.status.as_deref() {
        Some(s) if s.eq_ignore_ascii_case("success") => {}
        other => {
            return Err(FetchError::Malformed(format!(
                "status is {}",
                other.unwrap_or("missing")
            )))
        }
    }

    let info = resp
        .data
        .and_then(|d| d.basic_info)
        .ok_or_else(|| FetchError::Malformed("missing basicInfo".to_string()))?;

    Ok(PlayerStats {
        uid: uid.to_string(),
        name: info.nickname,
        level: info.level,
        exp: info.exp,
        region: info.region,
        likes: info.liked,
        last_update: chrono::Local::now().format(LAST_UPDATE_FORMAT).to_string(),
    })
}
