//! `WebSocket` endpoint bridging a connection into the [`BroadcastHub`].
//!
//! Clients connect to `GET /ws`. On upgrade the connection joins the
//! hub's live set and receives a greeting. From then on two halves run
//! side by side:
//!
//! - a writer task drains the subscriber's outbound queue into the socket
//! - the reader loop hands each text frame to the hub and queues any
//!   reply for this connection only
//!
//! The connection ends when the client closes, the socket errors, or the
//! hub drops the subscriber after a failed delivery. Ping frames are
//! answered by the protocol layer.
//!
//! [`BroadcastHub`]: crate::hub::BroadcastHub

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::hub::Subscription;
use crate::state::AppState;

/// Upgrade an HTTP request to a hub connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Drive one connection until either side goes away.
async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let Subscription { id, mut receiver } = state.hub.subscribe().await;
    debug!(subscriber = %id, "WebSocket client connected");

    let (mut sink, mut stream) = socket.split();

    let mut writer = tokio::spawn(async move {
        while let Some(message) = receiver.recv().await {
            let json = match message.to_json() {
                Ok(j) => j,
                Err(e) => {
                    warn!("Failed to serialize hub message: {e}");
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            // Queue closed by the hub or the socket refused a write.
            _ = &mut writer => {
                debug!(subscriber = %id, "WebSocket writer finished");
                break;
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = state.hub.handle_text(text.as_str()).await {
                            if !state.hub.send_to(id, reply).await {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(subscriber = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(subscriber = %id, "WebSocket error: {e}");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and control frames carry no hub messages.
                    }
                }
            }
        }
    }

    state.hub.unsubscribe(id).await;
    writer.abort();
}
