use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Scoreboard Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::sign_in,
        crate::routes::auth::sign_out,
        crate::routes::auth::me,
        crate::routes::sports::list_sports,
        crate::routes::sports::get_sport,
        crate::routes::teams::create_team,
        crate::routes::teams::list_teams,
        crate::routes::teams::get_team,
        crate::routes::teams::add_player,
        crate::routes::players::create_player,
        crate::routes::players::list_players,
        crate::routes::players::get_player,
        crate::routes::games::create_game,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::games::toggle_game_clock,
        crate::routes::games::toggle_shot_clock,
        crate::routes::games::adjust_game_clock,
        crate::routes::games::adjust_shot_clock,
        crate::routes::games::update_score,
        crate::routes::games::update_fouls,
        crate::routes::games::change_period,
        crate::routes::games::set_status,
        crate::routes::games::record_stat,
        crate::routes::games::list_stats,
        crate::routes::stats::overview,
        crate::routes::sse::game_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::auth::SignInRequest,
            crate::dto::auth::SignInResponse,
            crate::dto::auth::CurrentUser,
            crate::dto::sports::SportDto,
            crate::dto::sports::StatTypeDto,
            crate::dto::teams::CreateTeamRequest,
            crate::dto::teams::TeamSummary,
            crate::dto::teams::TeamDetail,
            crate::dto::players::NewPlayerInput,
            crate::dto::players::CreatePlayerRequest,
            crate::dto::players::PlayerSummary,
            crate::dto::players::PlayerDetail,
            crate::dto::players::TeamRoster,
            crate::dto::games::GameTeamInput,
            crate::dto::games::CreateGameRequest,
            crate::dto::games::GameSummary,
            crate::dto::games::GameDetail,
            crate::dto::games::ScoreRequest,
            crate::dto::games::FoulsRequest,
            crate::dto::games::AdjustGameClockRequest,
            crate::dto::games::AdjustShotClockRequest,
            crate::dto::games::PeriodRequest,
            crate::dto::games::StatusRequest,
            crate::dto::stats::CreatePlayerStatRequest,
            crate::dto::stats::PlayerStatSummary,
            crate::dto::stats::StatsOverview,
            crate::dto::stats::RecentGame,
            crate::dto::stats::SportBreakdown,
            crate::dto::sse::Handshake,
            crate::dto::sse::GameUpdatedEvent,
            crate::dto::sse::ShotClockExpiredEvent,
            crate::dto::sse::WriteFailedEvent,
            crate::dao::models::GameStatus,
            crate::state::scoreboard::TeamSide,
            crate::state::scoreboard::PeriodDirection,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session management"),
        (name = "sports", description = "Sport rule table"),
        (name = "teams", description = "Teams and rosters"),
        (name = "players", description = "Players"),
        (name = "games", description = "Games and live scoreboard controls"),
        (name = "stats", description = "Player stats and overview"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_live_controls() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/games/{id}/clock/shot/toggle"));
        assert!(doc.paths.paths.contains_key("/games/{id}/events"));
    }
}
