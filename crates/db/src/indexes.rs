use mongodb::{Database, IndexModel};
use tracing::info;

use crate::models::{Announcement, ChatMessage, TeamMember};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Members are keyed by uid through `_id`, which is already unique.
    create_indexes(
        db,
        TeamMember::COLLECTION,
        vec![index(bson::doc! { "status": 1 })],
    )
    .await?;

    // Chat window: latest N by timestamp
    create_indexes(
        db,
        ChatMessage::COLLECTION,
        vec![index(bson::doc! { "timestamp": -1 })],
    )
    .await?;

    // Announcements
    create_indexes(
        db,
        Announcement::COLLECTION,
        vec![
            index(bson::doc! { "timestamp": -1 }),
            index(bson::doc! { "author_id": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
