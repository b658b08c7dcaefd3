use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dto::players::{CreatePlayerRequest, PlayerDetail, PlayerSummary, TeamRoster},
    error::AppError,
    routes::auth::SessionUser,
    services::player_service,
    state::SharedState,
};

/// Player routes; all require a session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route("/players/{id}", get(get_player))
}

/// Create a player on one of the user's teams.
#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    params(("Authorization" = String, Header, description = "Bearer session token")),
    request_body = CreatePlayerRequest,
    responses(
        (status = 200, description = "Player created", body = PlayerSummary),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn create_player(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Valid(Json(payload)): Valid<Json<CreatePlayerRequest>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        player_service::create_player(&state, &user_id, payload).await?,
    ))
}

/// Players grouped by team.
#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    params(("Authorization" = String, Header, description = "Bearer session token")),
    responses((status = 200, description = "Rosters", body = [TeamRoster]))
)]
pub async fn list_players(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
) -> Result<Json<Vec<TeamRoster>>, AppError> {
    Ok(Json(player_service::list_players(&state, &user_id).await?))
}

/// Player with the stat lines recorded for them.
#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Player identifier")
    ),
    responses(
        (status = 200, description = "Player with recorded stats", body = PlayerDetail),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn get_player(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<PlayerDetail>, AppError> {
    Ok(Json(player_service::get_player(&state, &user_id, &id).await?))
}
