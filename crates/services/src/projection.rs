//! Display projections of the three realtime lists.

use huddle_db::models::{Announcement, ChatMessage, TeamMember, UserStatus};
use serde::Serialize;

/// Viewer first, then In Call, Online, Offline. Ties keep store order.
pub fn sort_roster(members: &mut [TeamMember], viewer: &str) {
    members.sort_by_key(|m| (m.uid != viewer, m.status.priority()));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceCounts {
    pub total: usize,
    pub online: usize,
    pub in_call: usize,
}

pub fn count_presence(members: &[TeamMember]) -> PresenceCounts {
    members
        .iter()
        .fold(PresenceCounts::default(), |mut counts, m| {
            counts.total += 1;
            match m.status {
                UserStatus::Online => counts.online += 1,
                UserStatus::InCall => counts.in_call += 1,
                UserStatus::Offline => {}
            }
            counts
        })
}

/// Turns a newest-first page into display order, oldest first.
pub fn chat_window(mut newest_first: Vec<ChatMessage>) -> Vec<ChatMessage> {
    newest_first.reverse();
    newest_first
}

/// Pinned first, then newest first.
pub fn order_announcements(announcements: &mut [Announcement]) {
    announcements.sort_by(|a, b| b.pinned.cmp(&a.pinned).then(b.timestamp.cmp(&a.timestamp)));
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub uid: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_status: Option<String>,
    pub last_seen: i64,
    pub is_current_user: bool,
}

impl MemberView {
    pub fn new(member: TeamMember, viewer: &str) -> Self {
        Self {
            is_current_user: member.uid == viewer,
            uid: member.uid,
            name: member.name,
            email: member.email,
            photo_url: member.photo_url,
            status: member.status,
            custom_status: member.custom_status,
            last_seen: member.last_seen,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageView {
    pub id: String,
    pub uid: String,
    pub name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub message: String,
    pub timestamp: i64,
}

impl From<ChatMessage> for ChatMessageView {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id.map(|id| id.to_hex()).unwrap_or_default(),
            uid: m.uid,
            name: m.name,
            photo_url: m.photo_url,
            message: m.message,
            timestamp: m.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub message: String,
    pub timestamp: i64,
    pub pinned: bool,
    /// Pin and delete controls are shown to the author only.
    pub can_manage: bool,
}

impl AnnouncementView {
    pub fn new(a: Announcement, viewer: &str) -> Self {
        Self {
            can_manage: a.is_authored_by(viewer),
            id: a.id.map(|id| id.to_hex()).unwrap_or_default(),
            author_id: a.author_id,
            author_name: a.author_name,
            author_photo: a.author_photo,
            message: a.message,
            timestamp: a.timestamp,
            pinned: a.pinned,
        }
    }
}

pub fn roster_view(mut members: Vec<TeamMember>, viewer: &str) -> Vec<MemberView> {
    sort_roster(&mut members, viewer);
    members
        .into_iter()
        .map(|m| MemberView::new(m, viewer))
        .collect()
}

pub fn chat_view(newest_first: Vec<ChatMessage>) -> Vec<ChatMessageView> {
    chat_window(newest_first)
        .into_iter()
        .map(ChatMessageView::from)
        .collect()
}

pub fn announcements_view(mut announcements: Vec<Announcement>, viewer: &str) -> Vec<AnnouncementView> {
    order_announcements(&mut announcements);
    announcements
        .into_iter()
        .map(|a| AnnouncementView::new(a, viewer))
        .collect()
}
