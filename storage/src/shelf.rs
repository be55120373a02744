use crate::Database;
use pixelfeed_core::{CoreError, Story};
use tracing::info;

/// Storage key for the saved-article shelf.
pub const SHELF_KEY: &str = "hn-shelf";

/// The user's reading shelf: saved stories, persisted as one JSON array.
/// Every mutation writes through to storage.
pub struct Shelf<'a> {
    db: &'a Database,
}

impl<'a> Shelf<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Saved stories in insertion order. Missing or corrupt data loads as
    /// an empty shelf.
    pub async fn list(&self) -> Result<Vec<Story>, CoreError> {
        Ok(self.db.get_json(SHELF_KEY).await?.unwrap_or_default())
    }

    /// Add a story. Returns false if a story with the same id is already
    /// shelved (the add is a no-op then).
    pub async fn add(&self, story: Story) -> Result<bool, CoreError> {
        let mut articles = self.list().await?;
        if articles.iter().any(|a| a.id == story.id) {
            return Ok(false);
        }

        info!("Adding story {} to shelf: {}", story.id, story.title);
        articles.push(story);
        self.db.save_json(SHELF_KEY, &articles).await?;
        Ok(true)
    }

    /// Remove a story by id. Returns false if it was not shelved.
    pub async fn remove(&self, story_id: u64) -> Result<bool, CoreError> {
        let mut articles = self.list().await?;
        let before = articles.len();
        articles.retain(|a| a.id != story_id);

        if articles.len() == before {
            return Ok(false);
        }

        info!("Removed story {} from shelf", story_id);
        self.db.save_json(SHELF_KEY, &articles).await?;
        Ok(true)
    }

    pub async fn contains(&self, story_id: u64) -> Result<bool, CoreError> {
        Ok(self.list().await?.iter().any(|a| a.id == story_id))
    }

    pub async fn count(&self) -> Result<usize, CoreError> {
        Ok(self.list().await?.len())
    }
}
