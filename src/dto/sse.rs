use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::games::GameSummary;

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name; unnamed when `None`.
    pub event: Option<String>,
    /// JSON payload.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// First event sent to a client subscribing to a game stream.
pub struct Handshake {
    /// Subscribed game.
    pub game_id: String,
    /// Greeting text.
    pub message: String,
    /// Whether the backend is running without a storage connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after every committed scoreboard change.
pub struct GameUpdatedEvent {
    /// Game after the change.
    pub game: GameSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the shot clock reaches zero and resets.
pub struct ShotClockExpiredEvent {
    /// Game whose shot clock expired.
    pub game_id: String,
    /// Value the shot clock was reset to.
    pub shot_clock_time: u8,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a scoreboard change could not be persisted.
pub struct WriteFailedEvent {
    /// Game whose change was lost.
    pub game_id: String,
    /// Storage error text.
    pub message: String,
}
