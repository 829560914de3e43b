use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub author_id: String,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub message: String,
    pub timestamp: i64,
    #[serde(default)]
    pub pinned: bool,
}

impl Announcement {
    pub const COLLECTION: &'static str = "announcements";

    pub fn is_authored_by(&self, uid: &str) -> bool {
        self.author_id == uid
    }
}
