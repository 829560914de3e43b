use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use huddle_db::models::ChatMessage;
use huddle_services::{
    Feed,
    projection::{ChatMessageView, chat_view},
    validation,
};
use serde::Deserialize;
use tracing::debug;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateChatMessageRequest {
    pub message: String,
}

/// The chat window, oldest first.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<ChatMessageView>>, ApiError> {
    let latest = state.chat.latest(ChatMessage::WINDOW).await?;
    Ok(Json(chat_view(latest)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateChatMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageView>), ApiError> {
    let message = validation::message_body(&body.message)?;

    let chat = state
        .chat
        .create(&auth.uid, &auth.profile, message, Utc::now().timestamp_millis())
        .await?;
    debug!(uid = %auth.uid, "Chat message posted");

    state.feeds.publish(Feed::Chat);
    Ok((StatusCode::CREATED, Json(ChatMessageView::from(chat))))
}
