use serde::{Deserialize, Serialize};

/// A Hacker News story as displayed and persisted by the client.
///
/// Only `title` (and optionally `url`) participate in interest scoring;
/// the remaining fields are display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub by: String,
    pub time: i64,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Number of comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descendants: Option<u32>,
}

/// An interest category: stories whose title or URL contain any of the
/// keywords score one point per matching keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// Optional context attached to a chat request.
#[derive(Debug, Clone)]
pub enum ArticleContext {
    /// Chat in the persona of a single story.
    Article { title: String, url: Option<String> },
    /// Analyze the user's saved shelf.
    ShelfAnalysis { articles: Vec<Story> },
}
