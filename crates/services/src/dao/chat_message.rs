use bson::{doc, oid::ObjectId};
use mongodb::Database;
use huddle_db::models::{ChatMessage, Profile};

use super::base::{BaseDao, DaoResult};

pub struct ChatMessageDao {
    pub base: BaseDao<ChatMessage>,
}

impl ChatMessageDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, ChatMessage::COLLECTION),
        }
    }

    /// Appends a message. `message` must already be validated.
    pub async fn create(
        &self,
        uid: &str,
        author: &Profile,
        message: String,
        timestamp: i64,
    ) -> DaoResult<ChatMessage> {
        let chat = ChatMessage {
            id: Some(ObjectId::new()),
            uid: uid.to_string(),
            name: author.name.clone(),
            photo_url: author.photo_url.clone(),
            message,
            timestamp,
        };

        self.base.insert_one(&chat).await?;
        Ok(chat)
    }

    /// The newest `limit` messages, newest first.
    pub async fn latest(&self, limit: i64) -> DaoResult<Vec<ChatMessage>> {
        self.base
            .find_many(doc! {}, Some(doc! { "timestamp": -1 }), Some(limit))
            .await
    }
}
