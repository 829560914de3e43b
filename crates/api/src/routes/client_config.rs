use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Bootstrap values a browser client needs before it can sign in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_key: String,
    pub project_id: String,
    pub app_id: String,
    pub auth_domain: String,
    pub long_polling: bool,
    pub meeting_url: String,
    pub drive_folder_url: String,
}

pub async fn get(State(state): State<AppState>) -> Json<ClientConfig> {
    let identity = &state.settings.identity;
    let links = &state.settings.links;
    Json(ClientConfig {
        api_key: identity.api_key.clone(),
        project_id: identity.project_id.clone(),
        app_id: identity.app_id.clone(),
        auth_domain: identity.auth_domain(),
        long_polling: identity.long_polling,
        meeting_url: links.meeting_url.clone(),
        drive_folder_url: links.drive_folder_url.clone(),
    })
}
