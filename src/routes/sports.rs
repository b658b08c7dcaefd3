use axum::{
    Json, Router,
    extract::Path,
    routing::get,
};

use crate::{
    dto::sports::SportDto,
    error::AppError,
    state::{SharedState, sport},
};

/// List every supported sport with its rules.
#[utoipa::path(
    get,
    path = "/sports",
    tag = "sports",
    responses((status = 200, description = "Sport rule table", body = [SportDto]))
)]
pub async fn list_sports() -> Json<Vec<SportDto>> {
    Json(sport::all().iter().map(Into::into).collect())
}

/// Rules of a single sport.
#[utoipa::path(
    get,
    path = "/sports/{id}",
    tag = "sports",
    params(("id" = String, Path, description = "Sport identifier, e.g. `basketball`")),
    responses(
        (status = 200, description = "Sport rules", body = SportDto),
        (status = 404, description = "Unknown sport")
    )
)]
pub async fn get_sport(Path(id): Path<String>) -> Result<Json<SportDto>, AppError> {
    sport::lookup(&id)
        .map(|sport| Json(sport.into()))
        .ok_or_else(|| AppError::NotFound(format!("sport `{id}` not found")))
}

/// Sport routes, open to anonymous callers.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sports", get(list_sports))
        .route("/sports/{id}", get(get_sport))
}
