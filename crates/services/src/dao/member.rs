use bson::doc;
use mongodb::Database;
use huddle_db::models::{PresencePatch, TeamMember};

use super::base::{BaseDao, DaoResult};

pub struct MemberDao {
    pub base: BaseDao<TeamMember>,
}

impl MemberDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, TeamMember::COLLECTION),
        }
    }

    /// Whole roster, in store order.
    pub async fn list_all(&self) -> DaoResult<Vec<TeamMember>> {
        self.base.find_many(doc! {}, None, None).await
    }

    pub async fn find(&self, uid: &str) -> DaoResult<Option<TeamMember>> {
        self.base.find_one(doc! { "_id": uid }).await
    }

    /// Merge-upsert keyed by uid; fields absent from the patch are preserved.
    pub async fn merge(&self, uid: &str, patch: &PresencePatch) -> DaoResult<()> {
        self.base
            .upsert_one(doc! { "_id": uid }, patch.to_update())
            .await
    }
}
