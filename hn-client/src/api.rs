use crate::metrics::{MetricsCollector, RequestMetrics};
use crate::retry::{with_retry, RetryConfig};
use pixelfeed_core::{CoreError, HnApiError, Story};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const HN_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// The story feeds exposed by the Hacker News API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Top,
    New,
    Best,
}

impl Feed {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Feed::Top => "/topstories.json",
            Feed::New => "/newstories.json",
            Feed::Best => "/beststories.json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feed::Top => "topstories",
            Feed::New => "newstories",
            Feed::Best => "beststories",
        }
    }
}

impl std::str::FromStr for Feed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Feed::Top),
            "new" => Ok(Feed::New),
            "best" => Ok(Feed::Best),
            other => Err(format!("unknown feed: {} (expected top, new, or best)", other)),
        }
    }
}

/// Raw item payload from `/v0/item/<id>.json`. Almost every field is
/// optional on the wire; deleted and dead markers are only present when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnItemData {
    pub id: u64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub by: Option<String>,
    pub time: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub score: Option<i64>,
    pub descendants: Option<u32>,
    #[serde(default)]
    pub kids: Vec<u64>,
    pub text: Option<String>,
}

impl HnItemData {
    /// Displayable story, or None for deleted, dead, or non-story items.
    pub fn into_story(self) -> Option<Story> {
        if self.deleted || self.dead {
            return None;
        }
        if self.kind.as_deref() != Some("story") {
            return None;
        }
        let title = self.title?;

        Some(Story {
            id: self.id,
            title,
            by: self.by.unwrap_or_default(),
            time: self.time.unwrap_or(0),
            score: self.score.unwrap_or(0),
            url: self.url,
            descendants: self.descendants,
        })
    }
}

#[derive(Debug)]
pub struct HnApiClient {
    http_client: Client,
    metrics: Arc<MetricsCollector>,
    retry_config: RetryConfig,
    base_url: String,
}

impl HnApiClient {
    pub fn new(user_agent: String) -> Self {
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            metrics: Arc::new(MetricsCollector::new()),
            retry_config: RetryConfig::hacker_news(),
            base_url: HN_API_BASE.to_string(),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, CoreError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let start_time = Instant::now();
        let mut success = false;
        let mut status_code = None;
        let mut error_type = None;

        debug!("Making Hacker News API request: GET {}", endpoint);
        let outcome = match self.http_client.get(&url).send().await {
            Ok(response) => {
                status_code = Some(response.status().as_u16());

                if response.status().is_success() {
                    match response.json::<T>().await {
                        Ok(value) => {
                            success = true;
                            Ok(value)
                        }
                        Err(e) => {
                            error!("Failed to parse response for {}: {}", endpoint, e);
                            error_type = Some("parse_error".to_string());
                            Err(CoreError::HnApi(HnApiError::InvalidResponse {
                                details: format!("Failed to parse response for {}", endpoint),
                            }))
                        }
                    }
                } else if response.status().is_server_error() {
                    error!(
                        "Request failed with status: {} for {}",
                        response.status(),
                        endpoint
                    );
                    error_type = Some("server_error".to_string());
                    Err(CoreError::HnApi(HnApiError::ServerError {
                        status_code: response.status().as_u16(),
                    }))
                } else {
                    error!(
                        "Request failed with status: {} for {}",
                        response.status(),
                        endpoint
                    );
                    error_type = Some("client_error".to_string());
                    Err(CoreError::HnApi(HnApiError::InvalidResponse {
                        details: format!("Unexpected status {} for {}", response.status(), endpoint),
                    }))
                }
            }
            Err(e) => {
                error!("Network error for GET {}: {}", endpoint, e);
                error_type = Some("network_error".to_string());

                if e.is_timeout() {
                    Err(CoreError::HnApi(HnApiError::RequestTimeout))
                } else {
                    Err(CoreError::Network(e))
                }
            }
        };

        let request_metrics = RequestMetrics {
            endpoint: endpoint.to_string(),
            status_code,
            response_time: start_time.elapsed(),
            success,
            error_type,
        };
        self.metrics.record_request(request_metrics).await;

        outcome
    }

    /// Ordered list of story ids for a feed (up to 500 for top stories).
    pub async fn story_ids(&self, feed: Feed) -> Result<Vec<u64>, CoreError> {
        let ids: Vec<u64> = with_retry(&self.retry_config, feed.label(), || {
            self.fetch_json(feed.endpoint())
        })
        .await
        .map_err(|e| match e {
            CoreError::HnApi(HnApiError::ServerError { .. }) => {
                CoreError::HnApi(HnApiError::FeedUnavailable {
                    feed: feed.label().to_string(),
                })
            }
            other => other,
        })?;

        info!("Retrieved {} story ids from {}", ids.len(), feed.label());
        Ok(ids)
    }

    /// Fetch a single item. The API returns a JSON `null` body for ids it
    /// does not know, which maps to `Ok(None)`.
    pub async fn item(&self, id: u64) -> Result<Option<HnItemData>, CoreError> {
        let endpoint = format!("/item/{}.json", id);
        let item: Option<HnItemData> =
            with_retry(&self.retry_config, "item", || self.fetch_json(&endpoint)).await?;

        debug!("Retrieved item {} (present: {})", id, item.is_some());
        Ok(item)
    }

    pub async fn get_metrics(&self) -> crate::metrics::ApiMetrics {
        self.metrics.get_metrics().await
    }

    pub async fn reset_metrics(&self) {
        self.metrics.reset_metrics().await;
    }
}
