use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::stats::{StatsOverview, StatsQuery},
    error::AppError,
    routes::auth::SessionUser,
    services::stats_service,
    state::SharedState,
};

/// Aggregated statistics over the user's games.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    params(
        ("Authorization" = String, Header, description = "Bearer session token"),
        StatsQuery
    ),
    responses((status = 200, description = "Stats overview", body = StatsOverview))
)]
pub async fn overview(
    State(state): State<SharedState>,
    Extension(SessionUser(user_id)): Extension<SessionUser>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsOverview>, AppError> {
    Ok(Json(stats_service::overview(&state, &user_id, query).await?))
}

/// Overview route.
pub fn router() -> Router<SharedState> {
    Router::new().route("/stats", get(overview))
}
