use crate::Database;
use pixelfeed_core::CoreError;
use tracing::info;

/// Storage key for the selected topic ids.
pub const INTERESTS_KEY: &str = "hn-interests";
/// Storage key for the meme-mode flag.
pub const MEME_MODE_KEY: &str = "hn-meme-mode";

/// User preferences persisted in the settings store. Explicitly injected
/// wherever preferences are read; nothing here is ambient state.
pub struct Preferences<'a> {
    db: &'a Database,
}

impl<'a> Preferences<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Selected topic ids, in selection order. A missing or unparsable
    /// value is an empty selection. Stale ids of removed topics are kept;
    /// they simply never match during scoring.
    pub async fn selected_topics(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.db.get_json(INTERESTS_KEY).await?.unwrap_or_default())
    }

    pub async fn set_selected_topics(&self, topics: &[String]) -> Result<(), CoreError> {
        self.db.save_json(INTERESTS_KEY, &topics).await
    }

    /// Flip one topic in or out of the selection. Returns true when the
    /// topic is selected after the toggle.
    pub async fn toggle_topic(&self, topic_id: &str) -> Result<bool, CoreError> {
        let mut topics = self.selected_topics().await?;

        let now_selected = if topics.iter().any(|t| t == topic_id) {
            topics.retain(|t| t != topic_id);
            false
        } else {
            topics.push(topic_id.to_string());
            true
        };

        info!(
            "Topic {} is now {}",
            topic_id,
            if now_selected { "selected" } else { "deselected" }
        );
        self.set_selected_topics(&topics).await?;
        Ok(now_selected)
    }

    pub async fn meme_mode(&self) -> Result<bool, CoreError> {
        Ok(self.db.get_json(MEME_MODE_KEY).await?.unwrap_or(false))
    }

    pub async fn set_meme_mode(&self, enabled: bool) -> Result<(), CoreError> {
        self.db.save_json(MEME_MODE_KEY, &enabled).await
    }
}
