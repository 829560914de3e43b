pub mod google_drive;

use serde::{Deserialize, Serialize};

/// A file in the shared team folder, as returned by the Drive listing API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub modified_time: String,
    pub web_view_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,
}

impl DriveFile {
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime_type)
    }
}

/// Icon family for a file, picked by MIME substring.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Document,
    Image,
    Video,
    Audio,
    Archive,
    Other,
}

impl FileKind {
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        if mime.contains("document") || mime.contains("pdf") {
            FileKind::Document
        } else if mime.contains("image") {
            FileKind::Image
        } else if mime.contains("video") {
            FileKind::Video
        } else if mime.contains("audio") {
            FileKind::Audio
        } else if mime.contains("spreadsheet") {
            FileKind::Document
        } else if mime.contains("zip") || mime.contains("archive") {
            FileKind::Archive
        } else {
            FileKind::Other
        }
    }
}
