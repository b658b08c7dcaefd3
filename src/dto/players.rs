use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::PlayerEntity,
    dto::{stats::PlayerStatSummary, teams::TeamSummary, validation::validate_not_blank},
};

/// Player fields supplied when creating a player inside a team.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct NewPlayerInput {
    /// Display name, at most 100 characters.
    #[validate(length(max = 100), custom(function = validate_not_blank))]
    pub name: String,
    /// Free-form position.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub position: Option<String>,
    /// Shirt number, 0 to 999.
    #[serde(default)]
    #[validate(range(max = 999))]
    pub jersey_number: Option<u16>,
}

/// Player creation with an explicit team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePlayerRequest {
    /// Team to join; must belong to the caller.
    #[validate(length(min = 1))]
    pub team_id: String,
    /// Player fields.
    #[serde(flatten)]
    #[validate(nested)]
    pub player: NewPlayerInput,
}

/// Player as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Player identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Team the player belongs to.
    pub team_id: String,
    /// Free-form position.
    pub position: Option<String>,
    /// Shirt number.
    pub jersey_number: Option<u16>,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl From<&PlayerEntity> for PlayerSummary {
    fn from(player: &PlayerEntity) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            team_id: player.team_id.clone(),
            position: player.position.clone(),
            jersey_number: player.jersey_number,
            created_at: player.created_at.to_string(),
        }
    }
}

/// Players of one team, as shown on the players page.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamRoster {
    /// The team.
    pub team: TeamSummary,
    /// Its players.
    pub players: Vec<PlayerSummary>,
}

/// Player with every stat recorded for them.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerDetail {
    /// Player fields.
    #[serde(flatten)]
    pub player: PlayerSummary,
    /// Stat lines, oldest first.
    pub stats: Vec<PlayerStatSummary>,
}
