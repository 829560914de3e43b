use axum::{Json, extract::State};
use huddle_db::models::UserStatus;
use huddle_services::{
    presence::PresenceEvent,
    projection::{MemberView, roster_view},
    validation,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStatusRequest {
    #[serde(default)]
    pub custom_status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    pub meeting_url: String,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<MemberView>>, ApiError> {
    let members = state.members.list_all().await?;
    Ok(Json(roster_view(members, &auth.uid)))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MemberView>, ApiError> {
    let member = state
        .members
        .find(&auth.uid)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;
    Ok(Json(MemberView::new(member, &auth.uid)))
}

pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<StatusRequest>,
) -> Result<Json<StatusRequest>, ApiError> {
    state
        .registry
        .apply(&auth.uid, PresenceEvent::SetStatus(body.status))
        .await?;
    Ok(Json(body))
}

/// An empty custom status clears it.
pub async fn set_custom_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CustomStatusRequest>,
) -> Result<Json<CustomStatusRequest>, ApiError> {
    let custom_status = validation::custom_status(&body.custom_status)?;
    state
        .registry
        .apply(&auth.uid, PresenceEvent::SaveCustomStatus(custom_status.clone()))
        .await?;
    Ok(Json(CustomStatusRequest { custom_status }))
}

/// Marks the user In Call and hands back the room to open.
pub async fn join_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeetingResponse>, ApiError> {
    state
        .registry
        .apply(&auth.uid, PresenceEvent::JoinMeeting)
        .await?;
    Ok(Json(MeetingResponse {
        meeting_url: state.settings.links.meeting_url.clone(),
    }))
}
