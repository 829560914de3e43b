use axum::{
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use huddle_db::models::{ChatMessage, Profile, UserStatus};
use huddle_services::{
    Feed,
    dao::base::DaoError,
    presence::{AttachmentId, PresenceEvent},
    projection::{announcements_view, chat_view, roster_view},
    validation,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast::error::RecvError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dispatcher::{WsSender, send_event, send_json};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
    /// Stable per browser tab; a reconnect with the same id replaces the
    /// previous session.
    pub session: Option<String>,
}

/// Messages a client sends over the socket.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "presence:visibility")]
    Visibility { visible: bool },
    #[serde(rename = "presence:focus")]
    Focus,
    #[serde(rename = "presence:join_meeting")]
    JoinMeeting,
    #[serde(rename = "presence:status")]
    Status { status: UserStatus },
    #[serde(rename = "presence:custom_status", rename_all = "camelCase")]
    CustomStatus { custom_status: String },
    #[serde(rename = "presence:unload")]
    Unload,
}

impl ClientMessage {
    /// The presence event this message stands for, if any.
    pub fn into_event(self) -> Result<Option<PresenceEvent>, DaoError> {
        Ok(match self {
            ClientMessage::Ping => None,
            ClientMessage::Visibility { visible } => Some(PresenceEvent::Visibility { visible }),
            ClientMessage::Focus => Some(PresenceEvent::FocusGained),
            ClientMessage::JoinMeeting => Some(PresenceEvent::JoinMeeting),
            ClientMessage::Status { status } => Some(PresenceEvent::SetStatus(status)),
            ClientMessage::CustomStatus { custom_status } => Some(
                PresenceEvent::SaveCustomStatus(validation::custom_status(&custom_status)?),
            ),
            ClientMessage::Unload => Some(PresenceEvent::Unload),
        })
    }
}

pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Response {
    // Verify the ID token before accepting the WebSocket
    let claims = match state.auth.verify_id_token(&params.token) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "WebSocket rejected");
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    };

    let session_id = params
        .session
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let profile = claims.profile();

    ws.on_upgrade(move |socket| handle_socket(socket, state, claims.sub, profile, session_id))
}

async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    uid: String,
    profile: Profile,
    session_id: String,
) {
    info!(%uid, %session_id, "WebSocket connected");

    let (sender, mut receiver) = socket.split();
    let sender: WsSender = Arc::new(Mutex::new(sender));

    let attachment = state.registry.attach(&uid, &session_id, profile);

    send_event(
        &sender,
        "connected",
        &serde_json::json!({ "uid": uid, "sessionId": session_id }),
    )
    .await;

    let feeds = tokio::spawn(push_feeds(state.clone(), uid.clone(), sender.clone()));

    // Message loop
    let mut unloaded = false;
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if handle_client_message(&state, &uid, &session_id, attachment, &sender, &text)
                    .await
                {
                    unloaded = true;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!(%uid, %session_id, %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    feeds.abort();

    // A socket that goes away without saying goodbye is a page unload.
    if !unloaded {
        state.registry.unload(&uid, &session_id, attachment).await;
    }

    info!(%uid, %session_id, "WebSocket disconnected");
}

/// Returns true once the session has been unloaded.
async fn handle_client_message(
    state: &AppState,
    uid: &str,
    session_id: &str,
    attachment: AttachmentId,
    sender: &WsSender,
    text: &str,
) -> bool {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            debug!(%uid, %e, "Unknown WS message");
            return false;
        }
    };
    debug!(%uid, %session_id, ?message, "WS message received");

    if message == ClientMessage::Ping {
        send_json(sender, &serde_json::json!({ "type": "pong" })).await;
        return false;
    }

    match message.into_event() {
        Ok(Some(PresenceEvent::Unload)) => {
            state.registry.unload(uid, session_id, attachment).await;
            true
        }
        Ok(Some(event)) => {
            if !state.registry.dispatch(uid, session_id, attachment, event) {
                debug!(%uid, %session_id, "No live presence session");
            }
            false
        }
        Ok(None) => false,
        Err(e) => {
            warn!(%uid, error = %e, "Rejected presence message");
            false
        }
    }
}

enum Push {
    Sent,
    Failed,
    Closed,
}

/// Pushes a full snapshot of every feed on connect and again whenever the
/// feed changes. A feed whose query fails is reported once and dropped.
async fn push_feeds(state: AppState, uid: String, sender: WsSender) {
    let mut changes = state.feeds.subscribe();
    let mut live: HashSet<Feed> = HashSet::new();

    for feed in Feed::ALL {
        match push_snapshot(&state, &sender, feed, &uid).await {
            Push::Sent => {
                live.insert(feed);
            }
            Push::Failed => {}
            Push::Closed => return,
        }
    }

    while !live.is_empty() {
        let pending: Vec<Feed> = match changes.recv().await {
            Ok(feed) if live.contains(&feed) => vec![feed],
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                debug!(%uid, skipped, "Feed receiver lagged, resending all");
                live.iter().copied().collect()
            }
            Err(RecvError::Closed) => return,
        };

        for feed in pending {
            match push_snapshot(&state, &sender, feed, &uid).await {
                Push::Sent => {}
                Push::Failed => {
                    live.remove(&feed);
                }
                Push::Closed => return,
            }
        }
    }
}

async fn push_snapshot(state: &AppState, sender: &WsSender, feed: Feed, viewer: &str) -> Push {
    let event = feed.snapshot_event();
    let sent = match feed {
        Feed::Roster => match state.members.list_all().await {
            Ok(members) => send_event(sender, event, &roster_view(members, viewer)).await,
            Err(e) => return feed_error(sender, feed, e).await,
        },
        Feed::Chat => match state.chat.latest(ChatMessage::WINDOW).await {
            Ok(messages) => send_event(sender, event, &chat_view(messages)).await,
            Err(e) => return feed_error(sender, feed, e).await,
        },
        Feed::Announcements => match state.announcements.list().await {
            Ok(announcements) => {
                send_event(sender, event, &announcements_view(announcements, viewer)).await
            }
            Err(e) => return feed_error(sender, feed, e).await,
        },
    };

    if sent { Push::Sent } else { Push::Closed }
}

async fn feed_error(sender: &WsSender, feed: Feed, err: DaoError) -> Push {
    warn!(feed = feed.as_str(), error = %err, "Feed query failed");
    let sent = send_event(
        sender,
        "feed:error",
        &serde_json::json!({
            "feed": feed,
            "message": format!("Failed to load {}", feed.as_str()),
        }),
    )
    .await;

    if sent { Push::Failed } else { Push::Closed }
}
