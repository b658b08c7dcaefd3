use serde::Serialize;
use tracing::warn;

use crate::{
    dao::models::GameEntity,
    dto::sse::{GameUpdatedEvent, ServerEvent, ShotClockExpiredEvent, WriteFailedEvent},
    state::SseHub,
};

/// First event of every game stream.
pub const EVENT_HANDSHAKE: &str = "handshake";
/// Scoreboard committed.
pub const EVENT_GAME_UPDATED: &str = "game.updated";
/// Shot clock ran out.
pub const EVENT_SHOT_CLOCK_EXPIRED: &str = "game.shot_clock_expired";
/// Scoreboard change not persisted.
pub const EVENT_WRITE_FAILED: &str = "game.write_failed";

/// Broadcast the committed scoreboard after a successful write.
pub fn broadcast_game_updated(hub: &SseHub, game: &GameEntity) {
    let payload = GameUpdatedEvent { game: game.into() };
    send_event(hub, EVENT_GAME_UPDATED, &payload);
}

/// Broadcast that the shot clock expired and was reset.
pub fn broadcast_shot_clock_expired(hub: &SseHub, game: &GameEntity) {
    let payload = ShotClockExpiredEvent {
        game_id: game.id.clone(),
        shot_clock_time: game.shot_clock_time,
    };
    send_event(hub, EVENT_SHOT_CLOCK_EXPIRED, &payload);
}

/// Broadcast that a change was rejected by the record store.
pub fn broadcast_write_failed(hub: &SseHub, game_id: &str, message: &str) {
    let payload = WriteFailedEvent {
        game_id: game_id.to_owned(),
        message: message.to_owned(),
    };
    send_event(hub, EVENT_WRITE_FAILED, &payload);
}

pub(crate) fn send_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
