use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, stream::SplitSink};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// Sends `{type, data}` to one connection. Returns false when the socket is
/// gone.
pub async fn send_event<T: Serialize>(sender: &WsSender, event_type: &str, data: &T) -> bool {
    let message = serde_json::json!({
        "type": event_type,
        "data": data,
    });
    send_json(sender, &message).await
}

pub async fn send_json(sender: &WsSender, message: &serde_json::Value) -> bool {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            warn!(%e, "Failed to encode WS message");
            return false;
        }
    };

    let mut guard = sender.lock().await;
    match guard.send(Message::text(text)).await {
        Ok(()) => {
            debug!("WS message sent");
            true
        }
        Err(e) => {
            debug!(%e, "Failed to send WS message");
            false
        }
    }
}
