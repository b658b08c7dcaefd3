use serde::Serialize;
use utoipa::ToSchema;

/// Reported state of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Storage is reachable.
    Ok,
    /// Storage is down; store-backed routes return 503.
    Degraded,
}

/// Response of the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Games with a running live actor in this process.
    pub live_games: usize,
}
