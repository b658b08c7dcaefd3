use tracing::debug;

use crate::{
    dao::{
        models::{PlayerEntity, PlayerStatEntity},
        record_store::{Direction, ListQuery},
        repository::Repository,
    },
    dto::players::{CreatePlayerRequest, PlayerDetail, PlayerSummary, TeamRoster},
    error::ServiceError,
    services::team_service,
    state::SharedState,
};

/// Create a player on one of the user's teams.
pub async fn create_player(
    state: &SharedState,
    user_id: &str,
    request: CreatePlayerRequest,
) -> Result<PlayerSummary, ServiceError> {
    let CreatePlayerRequest { team_id, player } = request;
    team_service::add_player(state, user_id, &team_id, player).await
}

/// Players of the user grouped by team, teams newest first.
pub async fn list_players(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<TeamRoster>, ServiceError> {
    let store = state.require_store().await?;
    let teams = team_service::user_teams(store.clone(), user_id).await?;
    let players = Repository::<PlayerEntity>::new(store)
        .list(
            ListQuery::new()
                .filter("user_id", user_id)
                .order_by("created_at", Direction::Asc),
        )
        .await?;

    Ok(teams
        .iter()
        .map(|team| TeamRoster {
            team: team.into(),
            players: players
                .iter()
                .filter(|player| player.team_id == team.id)
                .map(Into::into)
                .collect(),
        })
        .collect())
}

/// Player with every stat recorded for them, oldest first.
pub async fn get_player(
    state: &SharedState,
    user_id: &str,
    player_id: &str,
) -> Result<PlayerDetail, ServiceError> {
    let store = state.require_store().await?;
    let player = Repository::<PlayerEntity>::new(store.clone())
        .get_owned(player_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}` not found")))?;

    let stats = Repository::<PlayerStatEntity>::new(store)
        .list(
            ListQuery::new()
                .filter("player_id", player_id)
                .filter("user_id", user_id)
                .order_by("created_at", Direction::Asc),
        )
        .await?;

    debug!(player_id, stats = stats.len(), "player detail loaded");
    Ok(PlayerDetail {
        player: (&player).into(),
        stats: stats.iter().map(Into::into).collect(),
    })
}
