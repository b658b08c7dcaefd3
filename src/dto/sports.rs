use serde::Serialize;
use utoipa::ToSchema;

use crate::state::sport::{Sport, StatType};

/// Stat type of a sport.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatTypeDto {
    /// Stat identifier.
    pub id: String,
    /// Display label.
    pub name: String,
}

impl From<&StatType> for StatTypeDto {
    fn from(stat: &StatType) -> Self {
        Self {
            id: stat.id.to_owned(),
            name: stat.name.to_owned(),
        }
    }
}

/// Rules of a sport as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SportDto {
    /// Sport identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the scoreboard shows a shot clock.
    pub has_shot_clock: bool,
    /// Label of a period.
    pub period_name: String,
    /// Number of periods.
    pub total_periods: u8,
    /// Default step of the score buttons.
    pub score_increment: u32,
    /// Stats that can be recorded.
    pub stat_types: Vec<StatTypeDto>,
}

impl From<&Sport> for SportDto {
    fn from(sport: &Sport) -> Self {
        Self {
            id: sport.id.to_owned(),
            name: sport.name.to_owned(),
            has_shot_clock: sport.has_shot_clock,
            period_name: sport.period_name.to_owned(),
            total_periods: sport.total_periods,
            score_increment: sport.score_increment,
            stat_types: sport.stat_types.iter().map(Into::into).collect(),
        }
    }
}
