use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::{
    dto::sse::{Handshake, ServerEvent},
    error::ServiceError,
    services::{game_service, sse_events},
    state::SharedState,
};

/// Subscribe to the event stream of a game owned by `user_id`.
///
/// The handshake is queued on the returned receiver before any game event.
pub async fn subscribe_game(
    state: &SharedState,
    user_id: &str,
    game_id: &str,
) -> Result<broadcast::Receiver<ServerEvent>, ServiceError> {
    let live = game_service::live_game(state, user_id, game_id).await?;
    let receiver = live.events().subscribe();
    sse_events::send_event(
        live.events(),
        sse_events::EVENT_HANDSHAKE,
        &Handshake {
            game_id: game_id.to_owned(),
            message: "game stream connected".into(),
            degraded: state.is_degraded(),
        },
    );
    info!(game_id, "new game SSE connection");
    Ok(receiver)
}

/// Convert a broadcast receiver into an SSE response, forwarding events until
/// the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    game_id: String,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(game_id = %game_id, skipped, "SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        info!(game_id = %game_id, "game SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
