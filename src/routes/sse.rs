use std::convert::Infallible;

use axum::{
    Extension, Router,
    extract::{Path, State},
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;

use crate::{
    error::AppError, routes::auth::SessionUser, services::sse_service, state::SharedState,
};

#[utoipa::path(
    get,
    path = "/games/{id}/events",
    tag = "sse",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        ("id" = String, Path, description = "Game identifier")
    ),
    responses((status = 200, description = "Live game SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream live scoreboard events of a game.
pub async fn game_stream(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let receiver = sse_service::subscribe_game(&state, &user_id, &id).await?;
    Ok(sse_service::to_sse_stream(receiver, id))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/games/{id}/events", get(game_stream))
}
