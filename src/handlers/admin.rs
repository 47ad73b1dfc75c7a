use axum::{extract::State, Json};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::player::{
    validate_uid, AdminAddPlayersRequest, AdminAddResponse, DeletePlayerRequest, MessageResponse,
};
use crate::AppState;

/// Check the body's `password` before anything else in it is looked at, so a bad
/// secret gets the same 401 whatever the rest of the body holds.
async fn authorize<T: DeserializeOwned>(state: &AppState, body: Value, action: &str) -> Result<T, AppError> {
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");
    if !state.admin_secret.verify(password).await {
        tracing::warn!("Rejected admin {}: bad password", action);
        return Err(AppError::Unauthorized);
    }

    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("invalid request body: {}", e)))
}

// 管理员添加玩家; 拉取失败时也会建立空记录, 由后续同步补全
#[utoipa::path(
    post,
    path = "/api/adminaddplayers",
    request_body = AdminAddPlayersRequest,
    responses(
        (status = 200, description = "Players tracked", body = AdminAddResponse),
        (status = 400, description = "Missing or invalid uids", body = crate::error::ErrorBody),
        (status = 401, description = "Wrong password", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn add_players(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<AdminAddResponse>, AppError> {
    let payload: AdminAddPlayersRequest = authorize(&state, body, "add").await?;
    let uids = payload.uids.normalized().map_err(AppError::BadRequest)?;

    let summary = state.sync.admin_add(&uids).await?;
    tracing::info!(
        fetched = summary.fetched,
        pending = summary.pending,
        "Admin added {} players",
        uids.len()
    );

    Ok(Json(AdminAddResponse {
        message: format!("Processed {} player(s)", uids.len()),
        fetched: summary.fetched,
        pending: summary.pending,
    }))
}

// 管理员删除玩家; 不存在的 uid 同样返回成功
#[utoipa::path(
    post,
    path = "/api/deleteplayers",
    request_body = DeletePlayerRequest,
    responses(
        (status = 200, description = "Player removed", body = MessageResponse),
        (status = 400, description = "Missing or invalid uid", body = crate::error::ErrorBody),
        (status = 401, description = "Wrong password", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, AppError> {
    let payload: DeletePlayerRequest = authorize(&state, body, "delete").await?;
    let uid = validate_uid(&payload.uid).map_err(AppError::BadRequest)?;

    let removed = state.store.delete(uid).await?;
    if removed > 0 {
        tracing::info!(uid = %uid, "Player deleted");
    }

    Ok(Json(MessageResponse {
        message: format!("Player {} deleted", uid),
    }))
}
