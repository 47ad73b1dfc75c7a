use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::players::list_players,
        crate::handlers::players::sync_all,
        crate::handlers::players::sync_player,
        crate::handlers::admin::add_players,
        crate::handlers::admin::delete_player,
    ),
    components(
        schemas(
            crate::models::player::PlayerRecord,
            crate::models::player::PlayerStats,
            crate::models::player::UidList,
            crate::models::player::AdminAddPlayersRequest,
            crate::models::player::DeletePlayerRequest,
            crate::models::player::MessageResponse,
            crate::models::player::SyncOneResponse,
            crate::models::player::AdminAddResponse,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "players", description = "Tracked player stats and sync triggers"),
    )
)]
pub struct ApiDoc;
