use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Longest chat message or announcement body accepted, in characters.
pub const MAX_MESSAGE_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub uid: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub message: String,
    /// Epoch milliseconds, stamped by the writer.
    pub timestamp: i64,
}

impl ChatMessage {
    pub const COLLECTION: &'static str = "messages";
    /// Size of the visible chat window.
    pub const WINDOW: i64 = 50;
}
