/// Session sign-in and token resolution.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game creation, lookups and live controls.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Player creation and rosters.
pub mod player_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events streaming service.
pub mod sse_service;
/// Player stat recording.
pub mod stat_service;
/// Stats page aggregates.
pub mod stats_service;
/// Storage connection supervisor driving degraded mode.
pub mod storage_supervisor;
/// Team creation and lookups.
pub mod team_service;
