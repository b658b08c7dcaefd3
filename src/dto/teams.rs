use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::TeamEntity,
    dto::{
        players::{NewPlayerInput, PlayerSummary},
        validation::{validate_hex_color, validate_not_blank, validate_sport_id},
    },
};

/// Payload creating a team, optionally with its initial roster.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    /// Display name, at most 100 characters.
    #[validate(length(max = 100), custom(function = validate_not_blank))]
    pub name: String,
    /// `#RRGGBB`; the first unused palette color when omitted.
    #[serde(default)]
    #[validate(custom(function = validate_hex_color))]
    pub color: Option<String>,
    /// Sport id the team plays.
    #[serde(default)]
    #[validate(custom(function = validate_sport_id))]
    pub sport: Option<String>,
    /// Initial roster.
    #[serde(default)]
    #[validate(nested)]
    pub players: Vec<NewPlayerInput>,
}

/// Team as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamSummary {
    /// Team identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// `#RRGGBB` display color.
    pub color: String,
    /// Sport id, if any.
    pub sport: Option<String>,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl From<&TeamEntity> for TeamSummary {
    fn from(team: &TeamEntity) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            color: team.color.clone(),
            sport: team.sport.clone(),
            created_at: team.created_at.to_string(),
        }
    }
}

/// Team with its roster.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamDetail {
    /// Team fields.
    #[serde(flatten)]
    pub team: TeamSummary,
    /// Players of the team.
    pub players: Vec<PlayerSummary>,
}
