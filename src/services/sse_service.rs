use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;

use crate::{dto::sse::ServerEvent, state::SharedState};

/// Subscribe to the shared public SSE stream.
pub fn subscribe_public(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.public_sse().subscribe()
}

/// Convert a broadcast receiver into an SSE response, forwarding events until the client
/// disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
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
                            tracing::debug!(skipped, "public SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        tracing::info!("Public SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Send a human-readable info message onto the public SSE stream.
pub fn broadcast_public_info(state: &SharedState, message: &str) {
    state.public_sse().broadcast(ServerEvent::new(
        Some("info".to_string()),
        message.to_string(),
    ));
}
