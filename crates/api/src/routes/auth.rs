use axum::{Json, extract::State, http::StatusCode};
use huddle_services::projection::MemberView;
use tracing::info;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

/// Sign-in: refreshes the member's profile and marks them Online.
pub async fn session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MemberView>, ApiError> {
    state.registry.sign_in(&auth.uid, auth.profile.clone()).await?;
    info!(uid = %auth.uid, "Signed in");

    let member = state
        .members
        .find(&auth.uid)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    Ok(Json(MemberView::new(member, &auth.uid)))
}

/// Sign-out: Offline is written and every live session of the user is torn
/// down before the response goes out.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, ApiError> {
    state.registry.sign_out(&auth.uid).await?;
    Ok(StatusCode::NO_CONTENT)
}
