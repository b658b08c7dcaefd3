use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{GameEntity, GameStatus},
    dto::{
        sports::SportDto,
        teams::TeamSummary,
        validation::{validate_not_blank, validate_sport_id},
    },
    state::scoreboard::{PeriodDirection, TeamSide},
};

/// One side of a new game: an existing team or a team created on the fly.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum GameTeamInput {
    /// One of the caller's teams.
    Existing {
        /// Team identifier.
        team_id: String,
    },
    /// A team created with the game, taking the next palette color.
    New {
        /// Name of the new team.
        name: String,
    },
}

/// Payload used to start a new game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGameRequest {
    /// Sport whose rules apply.
    pub sport_id: String,
    /// Home team.
    pub team1: GameTeamInput,
    /// Away team.
    pub team2: GameTeamInput,
}

impl Validate for CreateGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_sport_id(&self.sport_id) {
            errors.add("sport_id", e);
        }

        for (field, side) in [("team1", &self.team1), ("team2", &self.team2)] {
            match side {
                GameTeamInput::New { name } => {
                    if let Err(e) = validate_not_blank(name) {
                        errors.add(field, e);
                    }
                }
                GameTeamInput::Existing { team_id } if team_id.is_empty() => {
                    errors.add(field, ValidationError::new("team_id_empty"));
                }
                GameTeamInput::Existing { .. } => {}
            }
        }

        if let (GameTeamInput::Existing { team_id: a }, GameTeamInput::Existing { team_id: b }) =
            (&self.team1, &self.team2)
        {
            if a == b {
                let mut err = ValidationError::new("same_team");
                err.message = Some("A team cannot play against itself".into());
                errors.add("team2", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Filters for the game list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GameListQuery {
    /// Only games of this sport.
    pub sport_id: Option<String>,
    /// Only games in this status.
    pub status: Option<GameStatus>,
    /// Maximum number of games returned, 50 by default.
    pub limit: Option<usize>,
}

/// Scoreboard state of a game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSummary {
    /// Game identifier.
    pub id: String,
    /// Sport whose rules apply.
    pub sport_id: String,
    /// Home team.
    pub team1_id: String,
    /// Away team.
    pub team2_id: String,
    /// Home team score.
    pub team1_score: u32,
    /// Away team score.
    pub team2_score: u32,
    /// Home team fouls.
    pub team1_fouls: u32,
    /// Away team fouls.
    pub team2_fouls: u32,
    /// Elapsed game time in seconds.
    pub game_time: u32,
    /// Seconds left on the shot clock.
    pub shot_clock_time: u8,
    /// Whether the game clock is counting.
    pub is_game_clock_running: bool,
    /// Whether the shot clock is counting.
    pub is_shot_clock_running: bool,
    /// 1-based period number.
    pub current_period: u8,
    /// Lifecycle status.
    pub game_status: GameStatus,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl From<&GameEntity> for GameSummary {
    fn from(game: &GameEntity) -> Self {
        Self {
            id: game.id.clone(),
            sport_id: game.sport_id.clone(),
            team1_id: game.team1_id.clone(),
            team2_id: game.team2_id.clone(),
            team1_score: game.team1_score,
            team2_score: game.team2_score,
            team1_fouls: game.team1_fouls,
            team2_fouls: game.team2_fouls,
            game_time: game.game_time,
            shot_clock_time: game.shot_clock_time,
            is_game_clock_running: game.is_game_clock_running,
            is_shot_clock_running: game.is_shot_clock_running,
            current_period: game.current_period,
            game_status: game.game_status,
            created_at: game.created_at.to_string(),
        }
    }
}

/// Game with its sport rules and both teams.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameDetail {
    /// Scoreboard fields.
    #[serde(flatten)]
    pub game: GameSummary,
    /// Rules of the game's sport.
    pub sport: SportDto,
    /// Home team, `null` when it no longer exists.
    pub team1: Option<TeamSummary>,
    /// Away team, `null` when it no longer exists.
    pub team2: Option<TeamSummary>,
}

/// Score change for one side.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScoreRequest {
    /// Side to change.
    pub team: TeamSide,
    /// Points to add; negative values subtract, floored at zero.
    #[validate(range(min = -1000, max = 1000))]
    pub delta: i32,
}

/// Foul change for one side.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FoulsRequest {
    /// Side to change.
    pub team: TeamSide,
    /// Fouls to add; negative values subtract, floored at zero.
    #[validate(range(min = -100, max = 100))]
    pub delta: i32,
}

/// Game clock correction.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustGameClockRequest {
    /// Whole minutes to add or remove.
    #[validate(range(min = -600, max = 600))]
    pub minutes: i32,
}

/// Shot clock correction.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustShotClockRequest {
    /// Seconds to add or remove.
    #[validate(range(min = -99, max = 99))]
    pub seconds: i32,
}

/// Period change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PeriodRequest {
    /// Next or previous period.
    pub direction: PeriodDirection,
}

/// Status change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    /// Target status.
    pub status: GameStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateGameRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn team_inputs_accept_ids_or_names() {
        let req = request(json!({
            "sport_id": "basketball",
            "team1": {"team_id": "t1"},
            "team2": {"name": "Visitors"},
        }));
        assert!(matches!(req.team1, GameTeamInput::Existing { .. }));
        assert!(matches!(req.team2, GameTeamInput::New { .. }));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn invalid_games_are_rejected() {
        let same = request(json!({
            "sport_id": "basketball",
            "team1": {"team_id": "t1"},
            "team2": {"team_id": "t1"},
        }));
        assert!(same.validate().is_err());

        let unknown = request(json!({
            "sport_id": "quidditch",
            "team1": {"name": "A"},
            "team2": {"name": " "},
        }));
        let errors = unknown.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sport_id"));
        assert!(errors.field_errors().contains_key("team2"));
    }
}
