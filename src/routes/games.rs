use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        games::{
            AdjustGameClockRequest, AdjustShotClockRequest, CreateGameRequest, FoulsRequest,
            GameDetail, GameListQuery, GameSummary, PeriodRequest, ScoreRequest, StatusRequest,
        },
        stats::{CreatePlayerStatRequest, PlayerStatSummary},
    },
    error::AppError,
    routes::auth::SessionUser,
    services::{game_service, stat_service},
    state::{SharedState, live::GameAction},
};

/// Game management and live scoreboard controls.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/clock/game/toggle", post(toggle_game_clock))
        .route("/games/{id}/clock/shot/toggle", post(toggle_shot_clock))
        .route("/games/{id}/clock/game/adjust", post(adjust_game_clock))
        .route("/games/{id}/clock/shot/adjust", post(adjust_shot_clock))
        .route("/games/{id}/score", post(update_score))
        .route("/games/{id}/fouls", post(update_fouls))
        .route("/games/{id}/period", post(change_period))
        .route("/games/{id}/status", put(set_status))
        .route("/games/{id}/stats", get(list_stats).post(record_stat))
}

async fn run_action(
    state: &SharedState,
    user_id: &str,
    id: &str,
    action: GameAction,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::apply_action(state, user_id, id, action).await?,
    ))
}

/// Start a game between two existing or new teams.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    params(("Authorization" = String, Header, description = "Bearer session token")),
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameDetail),
        (status = 400, description = "Invalid sport or teams"),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Valid(Json(payload)): Valid<Json<CreateGameRequest>>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(game_service::create_game(&state, &user_id, payload).await?))
}

/// Games of the signed-in user, newest first.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        GameListQuery
    ),
    responses((status = 200, description = "Games", body = [GameSummary]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Query(query): Query<GameListQuery>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    Ok(Json(game_service::list_games(&state, &user_id, query).await?))
}

/// Game with its sport rules and both teams.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses(
        (status = 200, description = "Game with sport and teams", body = GameDetail),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(game_service::get_game(&state, &user_id, &id).await?))
}

/// Start or stop the game clock. Starting it resumes a paused game.
#[utoipa::path(
    post,
    path = "/games/{id}/clock/game/toggle",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses(
        (status = 200, description = "Updated game", body = GameSummary),
        (status = 409, description = "Game finished"),
        (status = 503, description = "Update could not be persisted")
    )
)]
pub async fn toggle_game_clock(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    run_action(&state, &user_id, &id, GameAction::ToggleGameClock).await
}

/// Start or stop the shot clock; no change for sports without one.
#[utoipa::path(
    post,
    path = "/games/{id}/clock/shot/toggle",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses(
        (status = 200, description = "Updated game", body = GameSummary),
        (status = 409, description = "Game finished")
    )
)]
pub async fn toggle_shot_clock(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    run_action(&state, &user_id, &id, GameAction::ToggleShotClock).await
}

/// Move the game clock by whole minutes.
#[utoipa::path(
    post,
    path = "/games/{id}/clock/game/adjust",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = AdjustGameClockRequest,
    responses((status = 200, description = "Updated game", body = GameSummary))
)]
pub async fn adjust_game_clock(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<AdjustGameClockRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    let action = GameAction::AdjustGameTime {
        minutes: payload.minutes.into(),
    };
    run_action(&state, &user_id, &id, action).await
}

/// Move the shot clock by seconds.
#[utoipa::path(
    post,
    path = "/games/{id}/clock/shot/adjust",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = AdjustShotClockRequest,
    responses((status = 200, description = "Updated game", body = GameSummary))
)]
pub async fn adjust_shot_clock(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<AdjustShotClockRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    let action = GameAction::AdjustShotClock {
        seconds: payload.seconds.into(),
    };
    run_action(&state, &user_id, &id, action).await
}

/// Add to or remove from a team's score; the result never drops below zero.
#[utoipa::path(
    post,
    path = "/games/{id}/score",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Updated game", body = GameSummary),
        (status = 409, description = "Game finished")
    )
)]
pub async fn update_score(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<ScoreRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    let action = GameAction::Score {
        team: payload.team,
        delta: payload.delta.into(),
    };
    run_action(&state, &user_id, &id, action).await
}

/// Add to or remove from a team's fouls.
#[utoipa::path(
    post,
    path = "/games/{id}/fouls",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = FoulsRequest,
    responses((status = 200, description = "Updated game", body = GameSummary))
)]
pub async fn update_fouls(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<FoulsRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    let action = GameAction::Fouls {
        team: payload.team,
        delta: payload.delta.into(),
    };
    run_action(&state, &user_id, &id, action).await
}

/// Move to the next or previous period, stopping both clocks.
#[utoipa::path(
    post,
    path = "/games/{id}/period",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = PeriodRequest,
    responses((status = 200, description = "Updated game", body = GameSummary))
)]
pub async fn change_period(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<PeriodRequest>,
) -> Result<Json<GameSummary>, AppError> {
    run_action(&state, &user_id, &id, GameAction::Period(payload.direction)).await
}

/// Change the game status.
#[utoipa::path(
    put,
    path = "/games/{id}/status",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated game", body = GameSummary),
        (status = 409, description = "Invalid status transition")
    )
)]
pub async fn set_status(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<GameSummary>, AppError> {
    run_action(&state, &user_id, &id, GameAction::Status(payload.status)).await
}

/// Record a stat for a player of the game.
#[utoipa::path(
    post,
    path = "/games/{id}/stats",
    tag = "stats",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = CreatePlayerStatRequest,
    responses(
        (status = 200, description = "Stat recorded", body = PlayerStatSummary),
        (status = 400, description = "Stat type or player not part of the game"),
        (status = 404, description = "Unknown game or player")
    )
)]
pub async fn record_stat(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<CreatePlayerStatRequest>>,
) -> Result<Json<PlayerStatSummary>, AppError> {
    Ok(Json(
        stat_service::record_stat(&state, &user_id, &id, payload).await?,
    ))
}

/// Stats recorded during the game, oldest first.
#[utoipa::path(
    get,
    path = "/games/{id}/stats",
    tag = "stats",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses((status = 200, description = "Player stats", body = [PlayerStatSummary]))
)]
pub async fn list_stats(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlayerStatSummary>>, AppError> {
    Ok(Json(
        stat_service::list_game_stats(&state, &user_id, &id).await?,
    ))
}
