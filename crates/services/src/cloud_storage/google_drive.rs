use huddle_config::DriveSettings;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::DriveFile;

const LIST_FIELDS: &str = "files(id,name,mimeType,modifiedTime,webViewLink,iconLink)";

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Drive API returned {status}: {details}")]
    Upstream { status: u16, details: String },
    #[error("Drive request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Lists the shared team folder on behalf of the signed-in user. The caller's
/// access token is forwarded as-is; Drive decides whether it is valid.
pub struct GoogleDriveService {
    client: Client,
    api_base_url: String,
    folder_id: String,
    page_size: u32,
}

impl GoogleDriveService {
    pub fn new(settings: &DriveSettings) -> Self {
        Self {
            client: Client::new(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            folder_id: settings.folder_id.clone(),
            page_size: settings.page_size,
        }
    }

    pub async fn list_folder_files(&self, access_token: &str) -> Result<Vec<DriveFile>, DriveError> {
        let query = format!("'{}' in parents", self.folder_id);
        let page_size = self.page_size.to_string();

        let resp = self
            .client
            .get(format!("{}/files", self.api_base_url))
            .bearer_auth(access_token)
            .query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("orderBy", "modifiedTime desc"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let details = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %details, "Drive API error");
            return Err(DriveError::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let list: FileList = resp.json().await?;
        debug!(count = list.files.len(), folder = %self.folder_id, "Listed Drive files");
        Ok(list.files)
    }
}
