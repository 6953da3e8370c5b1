//! WebSocket live feed
//!
//! Every connection registers itself as a subscriber. The monitor actor
//! pushes status payloads through the connection's sink; the connection task
//! only reads, echoing text frames back with an acknowledgement prefix, and
//! deregisters when the client goes away. A connection the registry drops
//! (failed or timed out delivery) is closed from the server side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{
    SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

use crate::{actors::subscribers::Subscriber, api::state::ApiState};

/// Prefix of echoed client messages
pub const ACK_PREFIX: &str = "received: ";

/// How long a server-side close may take before the socket is just dropped
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Sending half of a live feed connection
///
/// Broadcasts and echoes share the sink, so sends are serialized.
struct WebSocketSubscriber {
    sink: Mutex<SplitSink<WebSocket, Message>>,

    /// Signalled when the registry drops this connection
    dropped: Notify,
}

#[async_trait]
impl Subscriber for WebSocketSubscriber {
    async fn deliver(&self, payload: &str) -> anyhow::Result<()> {
        self.sink
            .lock()
            .await
            .send(Message::Text(payload.to_string()))
            .await?;
        Ok(())
    }

    fn close(&self) {
        self.dropped.notify_one();
    }
}

/// WebSocket upgrade handler
///
/// GET /api/monitor/ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<ApiState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

/// Handle WebSocket connection
async fn handle_websocket(socket: WebSocket, state: ApiState) {
    let (sender, mut receiver) = socket.split();

    let subscriber = Arc::new(WebSocketSubscriber {
        sink: Mutex::new(sender),
        dropped: Notify::new(),
    });
    let id = state.subscribers.add(subscriber.clone()).await;
    info!("WebSocket client connected as {id}");

    loop {
        let msg = tokio::select! {
            _ = subscriber.dropped.notified() => {
                debug!("{id}: dropped by the registry, closing");
                let close = async { subscriber.sink.lock().await.close().await };
                if tokio::time::timeout(CLOSE_TIMEOUT, close).await.is_err() {
                    debug!("{id}: close timed out");
                }
                break;
            }
            msg = receiver.next() => msg,
        };

        let Some(msg) = msg else {
            break;
        };

        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = subscriber.deliver(&format!("{ACK_PREFIX}{text}")).await {
                    debug!("{id}: echo failed: {e:#}");
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // pings are answered by axum, binary frames are ignored
            }
            Err(e) => {
                debug!("{id}: receive failed: {e}");
                break;
            }
        }
    }

    state.subscribers.remove(id).await;
    info!("WebSocket client {id} disconnected");
}
