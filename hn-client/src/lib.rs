pub mod api;
pub mod metrics;
pub mod retry;

pub use api::{Feed, HnApiClient, HnItemData};

use futures::future::join_all;
use pixelfeed_core::{CoreError, HnApiError, Story};
use tracing::{info, warn};

/// Fixed page size for feed consumption.
pub const STORIES_PER_PAGE: usize = 20;

#[derive(Debug, Clone)]
pub struct StoryPage {
    pub stories: Vec<Story>,
    pub page: usize,
    pub total_pages: usize,
}

/// Paginated story supplier over the Hacker News API.
///
/// A page is assembled by slicing 20 ids out of the feed's id list and
/// fetching the items concurrently. Missing, deleted, dead, and non-story
/// items are dropped; individual fetch failures are logged and skipped so
/// one bad item never sinks the page. Feed order is preserved.
pub struct StoryFeed {
    client: HnApiClient,
}

impl StoryFeed {
    pub fn new(client: HnApiClient) -> Self {
        Self { client }
    }

    pub async fn fetch_page(&self, feed: Feed, page: usize) -> Result<StoryPage, CoreError> {
        let ids = self.client.story_ids(feed).await?;
        let total_pages = ids.len().div_ceil(STORIES_PER_PAGE);
        let page_ids = page_slice(&ids, page);

        let results = join_all(page_ids.iter().map(|&id| self.client.item(id))).await;

        let mut stories = Vec::with_capacity(page_ids.len());
        for (&id, result) in page_ids.iter().zip(results) {
            match result {
                Ok(Some(item)) => {
                    if let Some(story) = item.into_story() {
                        stories.push(story);
                    }
                }
                Ok(None) => warn!("Item {} not present in the API, skipping", id),
                Err(e) => warn!("Skipping item {}: {}", id, e),
            }
        }

        info!(
            "Fetched {} stories for page {} of {}",
            stories.len(),
            page,
            feed.label()
        );
        Ok(StoryPage {
            stories,
            page,
            total_pages,
        })
    }

    /// Fetch one story by id, for the shelf and chat context.
    pub async fn fetch_story(&self, id: u64) -> Result<Story, CoreError> {
        let item = self
            .client
            .item(id)
            .await?
            .ok_or(CoreError::HnApi(HnApiError::ItemNotFound { item_id: id }))?;

        item.into_story()
            .ok_or(CoreError::HnApi(HnApiError::ItemNotFound { item_id: id }))
    }

    pub fn client(&self) -> &HnApiClient {
        &self.client
    }
}

fn page_slice(ids: &[u64], page: usize) -> &[u64] {
    let start = page.saturating_mul(STORIES_PER_PAGE);
    if start >= ids.len() {
        return &[];
    }
    let end = (start + STORIES_PER_PAGE).min(ids.len());
    &ids[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slice_first_page() {
        let ids: Vec<u64> = (0..50).collect();
        let page = page_slice(&ids, 0);
        assert_eq!(page.len(), STORIES_PER_PAGE);
        assert_eq!(page[0], 0);
        assert_eq!(page[19], 19);
    }

    #[test]
    fn test_page_slice_last_partial_page() {
        let ids: Vec<u64> = (0..50).collect();
        let page = page_slice(&ids, 2);
        assert_eq!(page.len(), 10);
        assert_eq!(page[0], 40);
    }

    #[test]
    fn test_page_slice_past_the_end_is_empty() {
        let ids: Vec<u64> = (0..50).collect();
        assert!(page_slice(&ids, 3).is_empty());
        assert!(page_slice(&[], 0).is_empty());
    }

    #[test]
    fn test_total_pages_math() {
        assert_eq!(50usize.div_ceil(STORIES_PER_PAGE), 3);
        assert_eq!(40usize.div_ceil(STORIES_PER_PAGE), 2);
        assert_eq!(0usize.div_ceil(STORIES_PER_PAGE), 0);
    }
}
