use crate::error::*;
use std::time::Duration;
use tracing::{error, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn retry_after(&self) -> Option<Duration>;
    fn user_friendly_message(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::HnApi(e) => {
                error!("Hacker News API error details: {:?}", e);
            }
            CoreError::Storage(e) => {
                error!("Storage error details: {:?}", e);
            }
            CoreError::Llm(e) => {
                error!("LLM error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::HnApi(e) => e.is_retryable(),
            CoreError::Llm(e) => e.is_retryable(),
            CoreError::Network(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::HnApi(e) => e.retry_after(),
            CoreError::Llm(e) => e.retry_after(),
            _ if self.is_retryable() => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::HnApi(e) => e.user_friendly_message(),
            CoreError::Llm(e) => e.user_friendly_message(),
            CoreError::Storage(_) => {
                "Local storage error. Your saved data may be unavailable.".to_string()
            }
            CoreError::Config(_) => {
                "Configuration problem. Please check your config file.".to_string()
            }
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { .. } => {
                "Invalid input provided. Please check your input and try again.".to_string()
            }
            CoreError::NotFound { resource } => format!("Could not find: {}", resource),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }
}

impl ErrorExt for HnApiError {
    fn log_error(&self) -> &Self {
        error!("HnApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("HnApiError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            HnApiError::RequestTimeout => true,
            HnApiError::ServerError { status_code } => *status_code >= 500,
            HnApiError::FeedUnavailable { .. } => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        if self.is_retryable() {
            Some(Duration::from_secs(2))
        } else {
            None
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            HnApiError::ItemNotFound { item_id } => {
                format!("Story {} could not be found.", item_id)
            }
            HnApiError::FeedUnavailable { feed } => {
                format!("The {} feed is currently unavailable.", feed)
            }
            HnApiError::RequestTimeout => {
                "Hacker News took too long to respond. Please try again.".to_string()
            }
            HnApiError::InvalidResponse { .. } => {
                "Hacker News returned an unexpected response.".to_string()
            }
            HnApiError::ServerError { .. } => {
                "Hacker News is having server trouble. Please try again later.".to_string()
            }
        }
    }
}

impl ErrorExt for LlmError {
    fn log_error(&self) -> &Self {
        error!("LlmError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("LlmError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimitExceeded { .. }
                | LlmError::ServiceUnavailable { .. }
                | LlmError::RequestTimeout { .. }
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimitExceeded { retry_after, .. } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ if self.is_retryable() => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LlmError::InvalidApiKey { provider } => {
                format!("API key for {} is invalid or missing.", provider)
            }
            LlmError::AuthenticationFailed { provider } => {
                format!("Authentication with {} failed.", provider)
            }
            LlmError::RateLimitExceeded { provider, .. } => {
                format!("{} rate limit reached. Please wait and try again.", provider)
            }
            LlmError::ServiceUnavailable { provider } => {
                format!("{} is currently unavailable.", provider)
            }
            LlmError::RequestTimeout { provider } => {
                format!("{} took too long to respond.", provider)
            }
            LlmError::InvalidResponseFormat { provider } => {
                format!("{} returned an unexpected response.", provider)
            }
            LlmError::RequestRejected { provider, details } => {
                format!("{} rejected the request: {}", provider, details)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hn_api_error_retryability() {
        assert!(HnApiError::RequestTimeout.is_retryable());
        assert!(HnApiError::ServerError { status_code: 503 }.is_retryable());
        assert!(!HnApiError::ItemNotFound { item_id: 42 }.is_retryable());
        assert!(!HnApiError::InvalidResponse {
            details: "bad json".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_llm_rate_limit_retry_after() {
        let err = LlmError::RateLimitExceeded {
            provider: "openai".to_string(),
            retry_after: 30,
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_core_error_wraps_subdomain_retryability() {
        let err = CoreError::HnApi(HnApiError::ServerError { status_code: 500 });
        assert!(err.is_retryable());

        let err = CoreError::InvalidInput {
            message: "empty".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(err.retry_after().is_none());
    }

    #[test]
    fn test_user_friendly_messages_are_not_debug_dumps() {
        let err = CoreError::HnApi(HnApiError::ItemNotFound { item_id: 8863 });
        let msg = err.user_friendly_message();
        assert!(msg.contains("8863"));
        assert!(!msg.contains("ItemNotFound"));
    }
}
