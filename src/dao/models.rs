use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};
use utoipa::ToSchema;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// UTC creation time persisted as a fixed-width RFC 3339 string.
///
/// Every timestamp has the same width, so ordering the stored strings
/// lexically orders records chronologically in every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Current UTC time.
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Read a timestamp written by [`Timestamp`]'s `Display`.
    pub fn parse(raw: &str) -> Result<Self, time::error::Parse> {
        PrimitiveDateTime::parse(raw, TIMESTAMP_FORMAT).map(|dt| Self(dt.assume_utc()))
    }

    fn format(&self) -> String {
        self.0
            .to_offset(UtcOffset::UTC)
            .format(TIMESTAMP_FORMAT)
            .unwrap_or_default()
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Team owned by a user, optionally tied to a sport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Team identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// `#RRGGBB` display color.
    pub color: String,
    /// Sport the team plays, if any.
    #[serde(default)]
    pub sport: Option<String>,
    /// Owning user.
    pub user_id: String,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Player belonging to exactly one team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Player identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Team the player belongs to.
    pub team_id: String,
    /// Free-form position, e.g. `Guard`.
    #[serde(default)]
    pub position: Option<String>,
    /// Shirt number.
    #[serde(default)]
    pub jersey_number: Option<u16>,
    /// Owning user.
    pub user_id: String,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// In play; clocks may run.
    Active,
    /// Interrupted; clocks are stopped.
    Paused,
    /// Over; no further changes.
    Finished,
}

impl GameStatus {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Paused => "paused",
            GameStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted game record, the authoritative scoreboard state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Game identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
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
    /// Creation time.
    pub created_at: Timestamp,
}

/// Partial game update carrying absolute values for the changed fields only.
///
/// `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GamePatch {
    /// New home team score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team1_score: Option<u32>,
    /// New away team score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team2_score: Option<u32>,
    /// New home team fouls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team1_fouls: Option<u32>,
    /// New away team fouls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team2_fouls: Option<u32>,
    /// New elapsed game time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_time: Option<u32>,
    /// New shot clock value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_clock_time: Option<u8>,
    /// New game clock flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_game_clock_running: Option<bool>,
    /// New shot clock flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shot_clock_running: Option<bool>,
    /// New period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period: Option<u8>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_status: Option<GameStatus>,
}

impl GamePatch {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        *self == GamePatch::default()
    }
}

/// Append-only stat line recorded for a player during a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerStatEntity {
    /// Stat identifier.
    pub id: String,
    /// Game the stat was recorded in.
    pub game_id: String,
    /// Player the stat belongs to.
    pub player_id: String,
    /// Stat type id of the game's sport.
    pub stat_type: String,
    /// Recorded amount.
    pub value: f64,
    /// Owning user.
    pub user_id: String,
    /// Creation time.
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn timestamps_are_fixed_width_and_sortable() {
        let early = Timestamp::from(datetime!(2025-03-04 05:06:07 UTC));
        let late = Timestamp::from(datetime!(2025-03-04 05:06:07.123456 UTC));

        assert_eq!(early.to_string(), "2025-03-04T05:06:07.000000Z");
        assert_eq!(late.to_string(), "2025-03-04T05:06:07.123456Z");
        assert!(early.to_string() < late.to_string());
        assert_eq!(Timestamp::parse(&late.to_string()).unwrap(), late);
    }

    #[test]
    fn patch_serialises_only_changed_fields() {
        let patch = GamePatch {
            team1_score: Some(3),
            is_game_clock_running: Some(false),
            ..GamePatch::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"team1_score": 3, "is_game_clock_running": false})
        );
        assert!(GamePatch::default().is_empty());
    }
}
