use huddle_config::LinkSettings;
use huddle_db::models::{
    Announcement, ChatMessage, STATUS_PRESETS, StatusPreset, TeamMember,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::dao::announcement::AnnouncementDao;
use crate::dao::base::DaoResult;
use crate::dao::chat_message::ChatMessageDao;
use crate::dao::member::MemberDao;
use crate::projection::{
    AnnouncementView, ChatMessageView, MemberView, PresenceCounts, announcements_view, chat_view,
    count_presence, roster_view,
};

/// One independently loaded panel of the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Widget<T> {
    Ready { data: T },
    Failed { message: String },
}

impl<T> Widget<T> {
    fn from_result<U>(name: &str, result: &DaoResult<U>, f: impl FnOnce(&U) -> T) -> Self {
        match result {
            Ok(value) => Widget::Ready { data: f(value) },
            Err(e) => {
                warn!(widget = name, error = %e, "Dashboard widget failed to load");
                Widget::Failed {
                    message: format!("Failed to load {name}"),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Widget::Ready { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub me: Widget<Option<MemberView>>,
    pub roster: Widget<Vec<MemberView>>,
    pub counts: Widget<PresenceCounts>,
    pub chat: Widget<Vec<ChatMessageView>>,
    pub announcements: Widget<Vec<AnnouncementView>>,
    pub meeting_url: String,
    pub drive_folder_url: String,
    pub status_presets: &'static [StatusPreset],
}

pub struct DashboardService {
    members: Arc<MemberDao>,
    chat: Arc<ChatMessageDao>,
    announcements: Arc<AnnouncementDao>,
    links: LinkSettings,
}

impl DashboardService {
    pub fn new(
        members: Arc<MemberDao>,
        chat: Arc<ChatMessageDao>,
        announcements: Arc<AnnouncementDao>,
        links: LinkSettings,
    ) -> Self {
        Self {
            members,
            chat,
            announcements,
            links,
        }
    }

    pub async fn load(&self, viewer: &str) -> Dashboard {
        let (members, chat, announcements) = tokio::join!(
            self.members.list_all(),
            self.chat.latest(ChatMessage::WINDOW),
            self.announcements.list(),
        );
        compose(viewer, members, chat, announcements, &self.links)
    }
}

/// Builds the dashboard from the three query results. A failed query only
/// fails the widgets that depend on it.
pub fn compose(
    viewer: &str,
    members: DaoResult<Vec<TeamMember>>,
    chat: DaoResult<Vec<ChatMessage>>,
    announcements: DaoResult<Vec<Announcement>>,
    links: &LinkSettings,
) -> Dashboard {
    Dashboard {
        me: Widget::from_result("profile", &members, |m| {
            m.iter()
                .find(|m| m.uid == viewer)
                .cloned()
                .map(|m| MemberView::new(m, viewer))
        }),
        roster: Widget::from_result("team members", &members, |m| roster_view(m.clone(), viewer)),
        counts: Widget::from_result("presence counts", &members, |m| count_presence(m)),
        chat: Widget::from_result("chat", &chat, |c| chat_view(c.clone())),
        announcements: Widget::from_result("announcements", &announcements, |a| {
            announcements_view(a.clone(), viewer)
        }),
        meeting_url: links.meeting_url.clone(),
        drive_folder_url: links.drive_folder_url.clone(),
        status_presets: &STATUS_PRESETS,
    }
}
