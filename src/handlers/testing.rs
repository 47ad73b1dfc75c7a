//! Router-level helpers shared by the handler tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response};
use tower::ServiceExt;

use crate::auth::AdminSecret;
use crate::services::sync::SyncService;
use crate::services::testing::ScriptedSource;
use crate::store::memory::MemoryPlayerStore;
use crate::AppState;

pub const ADMIN_PASSWORD: &str = "correct-horse";

pub fn test_state(store: &Arc<MemoryPlayerStore>, source: &Arc<ScriptedSource>) -> Arc<AppState> {
    Arc::new(AppState {
        store: store.clone(),
        sync: Arc::new(SyncService::new(store.clone(), source.clone(), Duration::ZERO)),
        admin_secret: AdminSecret::from_plain(ADMIN_PASSWORD, 4).unwrap(),
    })
}

pub async fn send(
    state: Arc<AppState>,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    crate::build_router(state).oneshot(request).await.unwrap()
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
