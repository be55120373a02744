pub mod prompt;

pub use prompt::system_prompt;

use pixelfeed_core::{ArticleContext, ChatMessage, ChatRole, CoreError, LlmError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.8;

pub trait ChatProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        context: Option<&ArticleContext>,
    ) -> Result<String, CoreError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct OpenAiProvider {
    api_key: String,
    http_client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            http_client,
        }
    }

    /// OpenAI keys start with "sk-"; reject obviously wrong keys before
    /// sending anything over the wire.
    fn validate_api_key(&self) -> Result<(), CoreError> {
        if self.api_key.is_empty() || !self.api_key.starts_with("sk-") {
            return Err(CoreError::Llm(LlmError::InvalidApiKey {
                provider: "openai".to_string(),
            }));
        }
        Ok(())
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        context: Option<&ArticleContext>,
    ) -> Result<ChatCompletionRequest, CoreError> {
        let mut all_messages = Vec::with_capacity(messages.len() + 1);
        all_messages.push(ChatMessage {
            role: ChatRole::System,
            content: system_prompt(context)?,
        });
        all_messages.extend(messages.iter().cloned());

        Ok(ChatCompletionRequest {
            model: OPENAI_MODEL,
            messages: all_messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        })
    }
}

impl ChatProvider for OpenAiProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        context: Option<&ArticleContext>,
    ) -> Result<String, CoreError> {
        self.validate_api_key()?;

        let request = self.build_request(messages, context)?;
        debug!(
            "Sending chat request with {} messages (context: {})",
            request.messages.len(),
            context.is_some()
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", OPENAI_API_BASE))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Network error calling OpenAI: {}", e);
                if e.is_timeout() {
                    CoreError::Llm(LlmError::RequestTimeout {
                        provider: "openai".to_string(),
                    })
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            error!("OpenAI API error ({}): {}", status, body);

            return Err(match status.as_u16() {
                401 => CoreError::Llm(LlmError::AuthenticationFailed {
                    provider: "openai".to_string(),
                }),
                429 => CoreError::Llm(LlmError::RateLimitExceeded {
                    provider: "openai".to_string(),
                    retry_after: retry_after.unwrap_or(60),
                }),
                code if code >= 500 => CoreError::Llm(LlmError::ServiceUnavailable {
                    provider: "openai".to_string(),
                }),
                _ => CoreError::Llm(LlmError::RequestRejected {
                    provider: "openai".to_string(),
                    details: body,
                }),
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse OpenAI response: {}", e);
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: "openai".to_string(),
            })
        })?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: "openai".to_string(),
            }))?;

        info!("Received chat reply ({} chars)", reply.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_validation() {
        let provider = OpenAiProvider::new("sk-valid-looking-key".to_string());
        assert!(provider.validate_api_key().is_ok());

        let provider = OpenAiProvider::new(String::new());
        assert!(matches!(
            provider.validate_api_key(),
            Err(CoreError::Llm(LlmError::InvalidApiKey { .. }))
        ));

        let provider = OpenAiProvider::new("not-an-openai-key".to_string());
        assert!(provider.validate_api_key().is_err());
    }

    #[tokio::test]
    async fn test_chat_rejects_bad_key_before_any_network_call() {
        let provider = OpenAiProvider::new("bogus".to_string());
        let result = provider.chat(&[ChatMessage::user("hi")], None).await;
        assert!(matches!(
            result,
            Err(CoreError::Llm(LlmError::InvalidApiKey { .. }))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiProvider::new("sk-test".to_string());
        let request = provider
            .build_request(&[ChatMessage::user("What's new in Rust?")], None)
            .unwrap();

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert_eq!(request.messages[1].content, "What's new in Rust?");

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"temperature\":0.8"));
    }

    #[test]
    fn test_request_uses_article_persona_when_context_given() {
        let provider = OpenAiProvider::new("sk-test".to_string());
        let context = ArticleContext::Article {
            title: "SQLite is serverless".to_string(),
            url: None,
        };
        let request = provider
            .build_request(&[ChatMessage::user("who are you?")], Some(&context))
            .unwrap();

        assert!(request.messages[0].content.contains("SQLite is serverless"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Mmm... tasty read."}}
            ]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "Mmm... tasty read.");
    }
}
