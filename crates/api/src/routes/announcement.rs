use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use chrono::Utc;
use huddle_services::{
    Feed,
    projection::{AnnouncementView, announcements_view},
    validation,
};
use serde::Deserialize;
use tracing::info;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub message: String,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PinRequest {
    pub pinned: Option<bool>,
}

fn parse_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid announcement id".to_string()))
}

/// Pinned first, then newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AnnouncementView>>, ApiError> {
    let announcements = state.announcements.list().await?;
    Ok(Json(announcements_view(announcements, &auth.uid)))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<AnnouncementView>), ApiError> {
    let message = validation::message_body(&body.message)?;

    let announcement = state
        .announcements
        .create(
            &auth.uid,
            &auth.profile,
            message,
            body.pinned,
            Utc::now().timestamp_millis(),
        )
        .await?;
    info!(uid = %auth.uid, pinned = body.pinned, "Announcement posted");

    state.feeds.publish(Feed::Announcements);
    Ok((
        StatusCode::CREATED,
        Json(AnnouncementView::new(announcement, &auth.uid)),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.announcements.delete(id).await?;
    info!(uid = %auth.uid, %id, "Announcement deleted");

    state.feeds.publish(Feed::Announcements);
    Ok(StatusCode::NO_CONTENT)
}

/// Sets `pinned` when the body names it, otherwise flips the stored value.
pub async fn toggle_pin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<AnnouncementView>, ApiError> {
    let id = parse_id(&id)?;
    let request: PinRequest = if body.is_empty() {
        PinRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let mut announcement = state.announcements.find_by_id(id).await?;
    let pinned = request.pinned.unwrap_or(!announcement.pinned);
    state.announcements.set_pinned(id, pinned).await?;
    announcement.pinned = pinned;

    state.feeds.publish(Feed::Announcements);
    Ok(Json(AnnouncementView::new(announcement, &auth.uid)))
}
