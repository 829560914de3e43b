use async_trait::async_trait;
use huddle_db::models::PresencePatch;
use std::sync::Arc;

use crate::dao::base::DaoResult;
use crate::dao::member::MemberDao;
use crate::feed::{Feed, FeedHub};

/// Where presence writes land. Every write is a merge keyed by uid.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    async fn merge(&self, uid: &str, patch: &PresencePatch) -> DaoResult<()>;
}

/// Members collection, with a roster notification after each write.
pub struct MongoPresenceStore {
    members: Arc<MemberDao>,
    feeds: Arc<FeedHub>,
}

impl MongoPresenceStore {
    pub fn new(members: Arc<MemberDao>, feeds: Arc<FeedHub>) -> Self {
        Self { members, feeds }
    }
}

#[async_trait]
impl PresenceStore for MongoPresenceStore {
    async fn merge(&self, uid: &str, patch: &PresencePatch) -> DaoResult<()> {
        self.members.merge(uid, patch).await?;
        self.feeds.publish(Feed::Roster);
        Ok(())
    }
}
