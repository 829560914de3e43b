use bson::{doc, oid::ObjectId};
use mongodb::Database;
use huddle_db::models::{Announcement, Profile};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct AnnouncementDao {
    pub base: BaseDao<Announcement>,
}

impl AnnouncementDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Announcement::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        author_id: &str,
        author: &Profile,
        message: String,
        pinned: bool,
        timestamp: i64,
    ) -> DaoResult<Announcement> {
        let announcement = Announcement {
            id: Some(ObjectId::new()),
            author_id: author_id.to_string(),
            author_name: author.name.clone(),
            author_photo: author.photo_url.clone(),
            message,
            timestamp,
            pinned,
        };

        self.base.insert_one(&announcement).await?;
        Ok(announcement)
    }

    /// All announcements, newest first.
    pub async fn list(&self) -> DaoResult<Vec<Announcement>> {
        self.base
            .find_many(doc! {}, Some(doc! { "timestamp": -1 }), None)
            .await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<Announcement> {
        self.base.find_by_id(id).await
    }

    pub async fn set_pinned(&self, id: ObjectId, pinned: bool) -> DaoResult<()> {
        let matched = self
            .base
            .update_one(doc! { "_id": id }, doc! { "$set": { "pinned": pinned } })
            .await?;
        if !matched {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: ObjectId) -> DaoResult<()> {
        if !self.base.delete_one(doc! { "_id": id }).await? {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
