use axum::{
    routing::{get, post},
    Router,
};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod bg_task;
mod config;
mod db;
mod docs;
mod error;
mod handlers;
mod models;
mod services;
mod store;

use auth::AdminSecret;
use config::Config;
use services::player_api::PlayerApiClient;
use services::sync::SyncService;
use store::{MySqlPlayerStore, PlayerStore};

// Application State
pub struct AppState {
    pub store: Arc<dyn PlayerStore>,
    pub sync: Arc<SyncService>,
    pub admin_secret: AdminSecret,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let pool = db::establish_connection(&config).await?;

    let store: Arc<dyn PlayerStore> = Arc::new(MySqlPlayerStore::new(pool));
    let source = Arc::new(
        PlayerApiClient::new(config.player_api_url.clone(), config.player_api_timeout)
            .context("Failed to build player API client")?,
    );
    let sync = Arc::new(SyncService::new(store.clone(), source, config.min_refetch));
    let admin_secret = AdminSecret::from_source(&config.admin_secret)
        .context("Failed to prepare admin secret")?;

    let state = Arc::new(AppState {
        store,
        sync: sync.clone(),
        admin_secret,
    });

    tokio::spawn(bg_task::start_sync_scheduler(sync, config.sync_interval));

    let app = build_router(state);

    tracing::info!("listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/players", get(handlers::players::list_players))
        .route("/api/sync", post(handlers::players::sync_all))
        .route("/api/sync/:uid", post(handlers::players::sync_player))
        .route("/api/adminaddplayers", post(handlers::admin::add_players))
        .route("/api/deleteplayers", post(handlers::admin::delete_player))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", docs::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn root() -> &'static str {
    "Player Stats Sync API"
}
