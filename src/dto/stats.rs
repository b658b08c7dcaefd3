use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    dao::models::{GameStatus, PlayerStatEntity},
    dto::validation::validate_not_blank,
};

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

/// Stat line recorded for a player of the game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePlayerStatRequest {
    /// Player the stat belongs to.
    #[validate(custom(function = validate_not_blank))]
    pub player_id: String,
    /// One of the stat types of the game's sport.
    #[validate(custom(function = validate_not_blank))]
    pub stat_type: String,
    /// Recorded amount; must be finite.
    #[validate(custom(function = validate_finite))]
    pub value: f64,
}

/// Stored stat line.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerStatSummary {
    /// Stat identifier.
    pub id: String,
    /// Game the stat was recorded in.
    pub game_id: String,
    /// Player the stat belongs to.
    pub player_id: String,
    /// Stat type of the game's sport.
    pub stat_type: String,
    /// Recorded amount.
    pub value: f64,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl From<&PlayerStatEntity> for PlayerStatSummary {
    fn from(stat: &PlayerStatEntity) -> Self {
        Self {
            id: stat.id.clone(),
            game_id: stat.game_id.clone(),
            player_id: stat.player_id.clone(),
            stat_type: stat.stat_type.clone(),
            value: stat.value,
            created_at: stat.created_at.to_string(),
        }
    }
}

/// Query of the stats overview.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Restrict the overview to one sport.
    pub sport_id: Option<String>,
}

/// Recent game line of the overview, with resolved names.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentGame {
    /// Game identifier.
    pub id: String,
    /// Sport identifier.
    pub sport_id: String,
    /// Display name of the sport.
    pub sport_name: String,
    /// Home team name, or `Unknown Team` when the team is gone.
    pub team1_name: String,
    /// Away team name, or `Unknown Team` when the team is gone.
    pub team2_name: String,
    /// Home team score.
    pub team1_score: u32,
    /// Away team score.
    pub team2_score: u32,
    /// Current status.
    pub game_status: GameStatus,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

/// Games played per sport.
#[derive(Debug, Serialize, ToSchema)]
pub struct SportBreakdown {
    /// Sport identifier.
    pub sport_id: String,
    /// Display name of the sport.
    pub sport_name: String,
    /// Number of games of this sport.
    pub games: usize,
    /// Share of all games, 0 to 100.
    pub percentage: f64,
}

/// Aggregates shown on the stats page.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsOverview {
    /// Games matching the filter.
    pub total_games: usize,
    /// Matching games not yet finished.
    pub active_games: usize,
    /// Matching finished games.
    pub finished_games: usize,
    /// Mean combined score per game, rounded to one decimal.
    pub average_score: f64,
    /// Distinct sports across all of the user's games.
    pub sports_played: usize,
    /// Stat lines across all of the user's games.
    pub total_player_stats: usize,
    /// Ten most recent matching games.
    pub recent_games: Vec<RecentGame>,
    /// Per-sport share of all of the user's games.
    pub sport_breakdown: Vec<SportBreakdown>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: f64) -> CreatePlayerStatRequest {
        CreatePlayerStatRequest {
            player_id: "p1".into(),
            stat_type: "goals".into(),
            value,
        }
    }

    #[test]
    fn stat_values_must_be_finite() {
        assert!(request(2.5).validate().is_ok());
        assert!(request(-1.0).validate().is_ok());

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let errors = request(value).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("value"));
        }
    }

    #[test]
    fn blank_stat_fields_are_rejected() {
        let mut blank = request(1.0);
        blank.stat_type = "  ".into();
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("stat_type"));
    }
}
