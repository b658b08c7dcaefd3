use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        players::{NewPlayerInput, PlayerSummary},
        teams::{CreateTeamRequest, TeamDetail, TeamSummary},
    },
    error::AppError,
    routes::auth::SessionUser,
    services::team_service,
    state::SharedState,
};

/// Team management for the signed-in user.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route("/teams/{id}", get(get_team))
        .route("/teams/{id}/players", post(add_player))
}

/// Create a team, optionally with its initial roster.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    params(("Authorization" = String, Header, description = "Bearer session token")),
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Team created", body = TeamDetail),
        (status = 400, description = "Invalid team"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Valid(Json(payload)): Valid<Json<CreateTeamRequest>>,
) -> Result<Json<TeamDetail>, AppError> {
    Ok(Json(team_service::create_team(&state, &user_id, payload).await?))
}

/// Teams of the signed-in user, newest first.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    params(("Authorization" = String, Header, description = "Bearer session token")),
    responses((status = 200, description = "Teams", body = [TeamSummary]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    Ok(Json(team_service::list_teams(&state, &user_id).await?))
}

/// Team with its roster.
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Team identifier")
    ),
    responses(
        (status = 200, description = "Team with its players", body = TeamDetail),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<TeamDetail>, AppError> {
    Ok(Json(team_service::get_team(&state, &user_id, &id).await?))
}

/// Add a player to a team.
#[utoipa::path(
    post,
    path = "/teams/{id}/players",
    tag = "teams",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Team identifier")
    ),
    request_body = NewPlayerInput,
    responses(
        (status = 200, description = "Player created", body = PlayerSummary),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn add_player(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<NewPlayerInput>>,
) -> Result<Json<PlayerSummary>, AppError> {
    Ok(Json(
        team_service::add_player(&state, &user_id, &id, payload).await?,
    ))
}
