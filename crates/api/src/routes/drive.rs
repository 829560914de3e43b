use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use huddle_services::{
    auth::bearer_token,
    cloud_storage::{DriveFile, FileKind, google_drive::DriveError},
};
use serde::Serialize;
use tracing::error;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DriveFileResponse {
    #[serde(flatten)]
    pub file: DriveFile,
    pub kind: FileKind,
}

#[derive(Debug, Serialize)]
struct DriveErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn error_response(status: StatusCode, error: &'static str, details: Option<String>) -> Response {
    (status, Json(DriveErrorBody { error, details })).into_response()
}

/// Lists the shared folder with the caller's Drive access token. This route
/// keeps its own error body: upstream failures mirror Drive's status code.
pub async fn list_files(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let Some(access_token) = bearer_token(header) else {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized", None);
    };

    match state.drive.list_folder_files(access_token).await {
        Ok(files) => {
            let files: Vec<DriveFileResponse> = files
                .into_iter()
                .map(|file| DriveFileResponse {
                    kind: file.kind(),
                    file,
                })
                .collect();
            Json(files).into_response()
        }
        Err(DriveError::Upstream { status, details }) => error_response(
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            "Failed to fetch Drive files",
            Some(details),
        ),
        Err(e) => {
            error!(error = %e, "Error fetching Drive files");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
        }
    }
}
