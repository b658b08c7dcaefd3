//! Aggregates behind the stats page.

use std::collections::{HashMap, HashSet};

use crate::{
    dao::{
        models::{GameEntity, GameStatus, PlayerStatEntity},
        record_store::{Direction, ListQuery},
        repository::Repository,
    },
    dto::stats::{RecentGame, SportBreakdown, StatsOverview, StatsQuery},
    error::ServiceError,
    services::team_service,
    state::{SharedState, sport},
};

const RECENT_GAMES: usize = 10;
const UNKNOWN_TEAM: &str = "Unknown Team";
const UNKNOWN_SPORT: &str = "Unknown Sport";

/// Overview of the user's games, optionally restricted to one sport.
///
/// The sport breakdown, the number of sports played and the stat count always
/// cover every game of the user.
pub async fn overview(
    state: &SharedState,
    user_id: &str,
    query: StatsQuery,
) -> Result<StatsOverview, ServiceError> {
    let store = state.require_store().await?;

    let games = Repository::<GameEntity>::new(store.clone())
        .list(
            ListQuery::new()
                .filter("user_id", user_id)
                .order_by("created_at", Direction::Desc),
        )
        .await?;
    let total_player_stats = Repository::<PlayerStatEntity>::new(store.clone())
        .list(ListQuery::new().filter("user_id", user_id))
        .await?
        .len();
    let team_names = team_service::user_teams(store, user_id)
        .await?
        .into_iter()
        .map(|team| (team.id, team.name))
        .collect::<HashMap<_, _>>();

    let filtered = games
        .iter()
        .filter(|game| {
            query
                .sport_id
                .as_deref()
                .is_none_or(|sport_id| game.sport_id == sport_id)
        })
        .collect::<Vec<_>>();

    let total_score = filtered
        .iter()
        .map(|game| u64::from(game.team1_score) + u64::from(game.team2_score))
        .sum::<u64>();
    let average_score = if filtered.is_empty() {
        0.0
    } else {
        round_one_decimal(total_score as f64 / filtered.len() as f64)
    };

    let team_name = |team_id: &str| {
        team_names
            .get(team_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_TEAM.to_owned())
    };
    let recent_games = filtered
        .iter()
        .take(RECENT_GAMES)
        .map(|game| RecentGame {
            id: game.id.clone(),
            sport_id: game.sport_id.clone(),
            sport_name: sport::lookup(&game.sport_id)
                .map_or(UNKNOWN_SPORT, |sport| sport.name)
                .to_owned(),
            team1_name: team_name(&game.team1_id),
            team2_name: team_name(&game.team2_id),
            team1_score: game.team1_score,
            team2_score: game.team2_score,
            game_status: game.game_status,
            created_at: game.created_at.to_string(),
        })
        .collect();

    let sport_breakdown = sport::all()
        .iter()
        .map(|sport| {
            let count = games.iter().filter(|game| game.sport_id == sport.id).count();
            let percentage = if games.is_empty() {
                0.0
            } else {
                round_one_decimal(count as f64 * 100.0 / games.len() as f64)
            };
            SportBreakdown {
                sport_id: sport.id.to_owned(),
                sport_name: sport.name.to_owned(),
                games: count,
                percentage,
            }
        })
        .collect();

    Ok(StatsOverview {
        total_games: filtered.len(),
        active_games: count_status(&filtered, GameStatus::Active),
        finished_games: count_status(&filtered, GameStatus::Finished),
        average_score,
        sports_played: games
            .iter()
            .map(|game| game.sport_id.as_str())
            .collect::<HashSet<_>>()
            .len(),
        total_player_stats,
        recent_games,
        sport_breakdown,
    })
}

fn count_status(games: &[&GameEntity], status: GameStatus) -> usize {
    games.iter().filter(|game| game.game_status == status).count()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_round_to_one_decimal() {
        assert_eq!(round_one_decimal(7.0 / 3.0), 2.3);
        assert_eq!(round_one_decimal(2.25), 2.3);
        assert_eq!(round_one_decimal(100.0 / 3.0), 33.3);
    }
}
