use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// A live projection a client can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    Roster,
    Chat,
    Announcements,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::Roster, Feed::Chat, Feed::Announcements];

    pub fn as_str(self) -> &'static str {
        match self {
            Feed::Roster => "roster",
            Feed::Chat => "chat",
            Feed::Announcements => "announcements",
        }
    }

    /// WebSocket message type carrying a full snapshot of this feed.
    pub fn snapshot_event(self) -> &'static str {
        match self {
            Feed::Roster => "roster:snapshot",
            Feed::Chat => "chat:snapshot",
            Feed::Announcements => "announcements:snapshot",
        }
    }
}

/// Fan-out of "this collection changed" notifications.
///
/// Subscribers re-query on every notification and push the whole result, so
/// a lagging receiver loses nothing it cannot recover from the next snapshot.
pub struct FeedHub {
    tx: broadcast::Sender<Feed>,
}

impl FeedHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, feed: Feed) {
        // No receivers is fine: nobody is watching.
        let receivers = self.tx.send(feed).unwrap_or(0);
        trace!(feed = feed.as_str(), receivers, "Published feed change");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Feed> {
        self.tx.subscribe()
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new(64)
    }
}
