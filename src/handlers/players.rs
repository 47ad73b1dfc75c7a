use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::player::{validate_uid, MessageResponse, PlayerRecord, SyncOneResponse};
use crate::AppState;

// 玩家列表, 按等级降序
#[utoipa::path(
    get,
    path = "/api/players",
    responses(
        (status = 200, description = "Tracked players, highest level first", body = Vec<PlayerRecord>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerRecord>>, AppError> {
    let players = state.store.list_players().await?;
    Ok(Json(players))
}

// 全量同步, 等待整轮完成后返回
#[utoipa::path(
    post,
    path = "/api/sync",
    responses(
        (status = 200, description = "Sweep finished", body = MessageResponse),
        (status = 500, description = "Sweep could not start", body = crate::error::ErrorBody)
    )
)]
pub async fn sync_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, AppError> {
    let summary = state.sync.sync_all().await?;
    tracing::info!("Manual sync finished: {} players", summary.total);
    Ok(Json(MessageResponse {
        message: "Sync completed".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/sync/{uid}",
    params(
        ("uid" = String, Path, description = "Player UID")
    ),
    responses(
        (status = 200, description = "Player synced", body = SyncOneResponse),
        (status = 400, description = "Invalid uid", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown to the upstream API", body = crate::error::ErrorBody),
        (status = 500, description = "Fetch or storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn sync_player(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<SyncOneResponse>, AppError> {
    let uid = validate_uid(&uid).map_err(AppError::BadRequest)?;

    let data = state.sync.sync_one(uid).await?;
    Ok(Json(SyncOneResponse {
        message: format!("Player {} synced", uid),
        data,
    }))
}
