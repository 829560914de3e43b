use axum::{Json, extract::State};
use huddle_services::dashboard::Dashboard;

use crate::{extractors::auth::AuthUser, state::AppState};

/// Every widget loads independently, so this never fails as a whole.
pub async fn get(State(state): State<AppState>, auth: AuthUser) -> Json<Dashboard> {
    Json(state.dashboard.load(&auth.uid).await)
}
