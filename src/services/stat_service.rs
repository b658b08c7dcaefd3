use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{PlayerEntity, PlayerStatEntity, Timestamp},
        record_store::{Direction, ListQuery},
        repository::Repository,
    },
    dto::stats::{CreatePlayerStatRequest, PlayerStatSummary},
    error::ServiceError,
    services::game_service,
    state::{SharedState, sport},
};

/// Append a stat line for a player taking part in the game.
pub async fn record_stat(
    state: &SharedState,
    user_id: &str,
    game_id: &str,
    request: CreatePlayerStatRequest,
) -> Result<PlayerStatSummary, ServiceError> {
    let store = state.require_store().await?;
    let game = game_service::owned_game(store.clone(), user_id, game_id).await?;

    let sport = sport::lookup(&game.sport_id).ok_or_else(|| {
        ServiceError::Internal(format!("unknown sport `{}`", game.sport_id))
    })?;
    if !sport.has_stat_type(&request.stat_type) {
        return Err(ServiceError::InvalidInput(format!(
            "stat type `{}` does not exist for {}",
            request.stat_type, sport.name
        )));
    }

    let player = Repository::<PlayerEntity>::new(store.clone())
        .get_owned(&request.player_id, user_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("player `{}` not found", request.player_id))
        })?;
    if player.team_id != game.team1_id && player.team_id != game.team2_id {
        return Err(ServiceError::InvalidInput(format!(
            "player `{}` does not play in game `{game_id}`",
            player.id
        )));
    }

    let stat = PlayerStatEntity {
        id: Uuid::new_v4().to_string(),
        game_id: game.id,
        player_id: player.id,
        stat_type: request.stat_type,
        value: request.value,
        user_id: user_id.to_owned(),
        created_at: Timestamp::now(),
    };
    let stat = Repository::<PlayerStatEntity>::new(store).create(&stat).await?;
    info!(game_id, player_id = %stat.player_id, stat_type = %stat.stat_type, "player stat recorded");
    Ok((&stat).into())
}

/// Stats recorded during a game, oldest first.
pub async fn list_game_stats(
    state: &SharedState,
    user_id: &str,
    game_id: &str,
) -> Result<Vec<PlayerStatSummary>, ServiceError> {
    let store = state.require_store().await?;
    let game = game_service::owned_game(store.clone(), user_id, game_id).await?;

    let stats = Repository::<PlayerStatEntity>::new(store)
        .list(
            ListQuery::new()
                .filter("game_id", game.id)
                .filter("user_id", user_id)
                .order_by("created_at", Direction::Asc),
        )
        .await?;
    Ok(stats.iter().map(Into::into).collect())
}
