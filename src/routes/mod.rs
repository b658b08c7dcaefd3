use axum::{Router, middleware};

use crate::state::SharedState;

/// Session routes and the `require_user` middleware.
pub mod auth;
/// Swagger UI and OpenAPI JSON.
pub mod docs;
/// Game creation, live controls and stat lines.
pub mod games;
/// Health check.
pub mod health;
/// Player routes.
pub mod players;
/// Static sport rules.
pub mod sports;
/// Live game event stream.
pub mod sse;
/// Stats overview.
pub mod stats;
/// Team routes.
pub mod teams;

/// Compose all route trees, wiring in shared state and documentation routes.
///
/// Everything except health, docs, sports and auth requires a session.
pub fn router(state: SharedState) -> Router<()> {
    let protected = teams::router()
        .merge(players::router())
        .merge(games::router())
        .merge(stats::router())
        .merge(sse::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    let api_router = health::router()
        .merge(auth::router())
        .merge(sports::router())
        .merge(protected);

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
