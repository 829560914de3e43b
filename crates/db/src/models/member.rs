use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest custom status accepted, in characters.
pub const CUSTOM_STATUS_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum UserStatus {
    Online,
    #[default]
    Offline,
    #[serde(rename = "In Call")]
    InCall,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Online => "Online",
            UserStatus::Offline => "Offline",
            UserStatus::InCall => "In Call",
        }
    }

    /// Roster ordering: lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            UserStatus::InCall => 0,
            UserStatus::Online => 1,
            UserStatus::Offline => 2,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One document per signed-in user, keyed by the identity provider's uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(rename = "_id")]
    pub uid: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status: Option<String>,
    #[serde(default)]
    pub last_seen: i64,
}

fn default_name() -> String {
    "Unknown User".to_string()
}

impl TeamMember {
    pub const COLLECTION: &'static str = "members";

    /// An unobserved member, the base a merge-write lands on.
    pub fn blank(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: default_name(),
            email: String::new(),
            photo_url: None,
            status: UserStatus::Offline,
            custom_status: None,
            last_seen: 0,
        }
    }
}

/// Profile fields refreshed from the identity token on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

impl Profile {
    pub fn new(name: Option<String>, email: Option<String>, photo_url: Option<String>) -> Self {
        Self {
            name: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(default_name),
            email: email.unwrap_or_default(),
            photo_url: photo_url.filter(|p| !p.is_empty()),
        }
    }
}

/// A partial update of a member document. Only the fields that are `Some`
/// are written; everything else on the stored document is left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresencePatch {
    pub profile: Option<Profile>,
    pub status: Option<UserStatus>,
    /// An empty string removes the custom status.
    pub custom_status: Option<String>,
    pub last_seen: Option<i64>,
}

impl PresencePatch {
    pub fn status(status: UserStatus, now_ms: i64) -> Self {
        Self {
            status: Some(status),
            last_seen: Some(now_ms),
            ..Default::default()
        }
    }

    pub fn sign_in(profile: Profile, now_ms: i64) -> Self {
        Self {
            profile: Some(profile),
            ..Self::status(UserStatus::Online, now_ms)
        }
    }

    pub fn custom_status(text: impl Into<String>) -> Self {
        Self {
            custom_status: Some(text.into()),
            ..Default::default()
        }
    }

    /// Builds the `$set` / `$unset` update document for an upsert.
    pub fn to_update(&self) -> Document {
        let mut set = Document::new();
        let mut unset = Document::new();

        if let Some(profile) = &self.profile {
            set.insert("name", profile.name.clone());
            set.insert("email", profile.email.clone());
            set.insert(
                "photo_url",
                profile
                    .photo_url
                    .clone()
                    .map(Bson::String)
                    .unwrap_or(Bson::Null),
            );
        }
        if let Some(status) = self.status {
            set.insert("status", status.as_str());
        }
        if let Some(last_seen) = self.last_seen {
            set.insert("last_seen", last_seen);
        }
        match self.custom_status.as_deref() {
            Some("") => {
                unset.insert("custom_status", "");
            }
            Some(text) => {
                set.insert("custom_status", text);
            }
            None => {}
        }

        let mut update = Document::new();
        if !set.is_empty() {
            update.insert("$set", set);
        }
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        update
    }

    /// Applies the patch to an in-memory member with the same merge rules as
    /// [`PresencePatch::to_update`].
    pub fn apply(&self, member: &mut TeamMember) {
        if let Some(profile) = &self.profile {
            member.name = profile.name.clone();
            member.email = profile.email.clone();
            member.photo_url = profile.photo_url.clone();
        }
        if let Some(status) = self.status {
            member.status = status;
        }
        if let Some(last_seen) = self.last_seen {
            member.last_seen = last_seen;
        }
        match self.custom_status.as_deref() {
            Some("") => member.custom_status = None,
            Some(text) => member.custom_status = Some(text.to_string()),
            None => {}
        }
    }
}
