//! Anthropic API client implementation for chat functionality.
//!
//! This module provides integration with Anthropic's Claude models through their API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    chat::{ChatMessage, ChatProvider},
    error::ChainError,
};

/// Default base URL for the Anthropic API.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Maximum output tokens requested from the model when the caller does not
/// override it.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Client for interacting with Anthropic's API.
///
/// Provides methods for chat requests using Anthropic's models.
#[derive(Debug)]
pub struct Anthropic {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub base_url: String,
    client: Client,
}

/// Request payload for Anthropic's messages API endpoint.
#[derive(Serialize)]
struct AnthropicCompleteRequest<'a> {
    messages: Vec<AnthropicMessage<'a>>,
    model: &'a str,
    max_tokens: u32,
}

/// Individual message in an Anthropic chat conversation.
#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from Anthropic's messages API endpoint.
#[derive(Deserialize)]
struct AnthropicCompleteResponse {
    content: Vec<AnthropicContent>,
}

/// Typed content block within an Anthropic API response.
///
/// Responses may interleave non-text blocks with text ones. Keeping the tag
/// explicit lets callers distinguish "the model returned no text" from "the
/// model returned an empty string".
#[derive(Deserialize)]
#[serde(tag = "type")]
enum AnthropicContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl AnthropicCompleteResponse {
    /// First text block in the response, if any.
    fn first_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| match block {
            AnthropicContent::Text { text } => Some(text),
            AnthropicContent::Other => None,
        })
    }
}

impl Anthropic {
    /// Creates a new Anthropic client with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key for authentication
    /// * `model` - Model identifier (defaults to "claude-3-opus-20240229")
    /// * `max_tokens` - Maximum tokens in response (defaults to 1000)
    /// * `timeout_seconds` - Request timeout in seconds (defaults to 30)
    /// * `base_url` - API base URL (defaults to the public Anthropic endpoint)
    pub fn new(
        api_key: impl Into<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        timeout_seconds: Option<u64>,
        base_url: Option<String>,
    ) -> Result<Self, ChainError> {
        let timeout_seconds = timeout_seconds.unwrap_or(30);
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ChainError::HttpError(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_seconds,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        })
    }
}

#[async_trait]
impl ChatProvider for Anthropic {
    /// Sends a chat request to Anthropic's API.
    ///
    /// # Arguments
    ///
    /// * `messages` - Slice of chat messages representing the conversation
    ///
    /// # Returns
    ///
    /// The text of the model's first text content block, or an error
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChainError> {
        if self.api_key.is_empty() {
            return Err(ChainError::AuthError(
                "Missing Anthropic API key".to_string(),
            ));
        }

        let anthropic_messages: Vec<AnthropicMessage> = messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let req_body = AnthropicCompleteRequest {
            messages: anthropic_messages,
            model: &self.model,
            max_tokens: self.max_tokens,
        };

        log::debug!(
            "sending {} message(s) to {} (model {})",
            messages.len(),
            self.base_url,
            self.model
        );

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .header("anthropic-version", "2023-06-01")
            .json(&req_body)
            .send()
            .await?
            .error_for_status()?;

        let json_resp: AnthropicCompleteResponse = resp
            .json()
            .await
            .map_err(|e| ChainError::JsonError(e.to_string()))?;

        json_resp.first_text().ok_or_else(|| {
            ChainError::ProviderError("No text content returned by Anthropic".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> Anthropic {
        Anthropic::new(
            "test-key",
            None,
            None,
            None,
            Some(server.base_url()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_auth_and_version_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "test-key")
                .header("anthropic-version", "2023-06-01")
                .json_body_partial(r#"{"model": "claude-3-opus-20240229", "max_tokens": 1000}"#);
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "hello"}]}));
        });

        let provider = client_for(&server);
        let messages = [ChatMessage::user().content("Hi").build()];
        let reply = provider.chat(&messages).await.unwrap();

        mock.assert();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn skips_non_text_blocks() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200).json_body(json!({
                "content": [
                    {"type": "tool_use", "id": "t1", "name": "calc", "input": {}},
                    {"type": "text", "text": "after the tool"}
                ]
            }));
        });

        let provider = client_for(&server);
        let messages = [ChatMessage::user().content("Hi").build()];
        let reply = provider.chat(&messages).await.unwrap();
        assert_eq!(reply, "after the tool");
    }

    #[tokio::test]
    async fn missing_text_block_is_an_error_not_empty_string() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200).json_body(json!({
                "content": [{"type": "tool_use", "id": "t1", "name": "calc", "input": {}}]
            }));
        });

        let provider = client_for(&server);
        let messages = [ChatMessage::user().content("Hi").build()];
        let err = provider.chat(&messages).await.unwrap_err();
        assert!(matches!(err, ChainError::ProviderError(_)));
    }

    #[tokio::test]
    async fn empty_api_key_fails_before_any_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "unreachable"}]}));
        });

        let provider =
            Anthropic::new("", None, None, None, Some(server.base_url())).unwrap();
        let messages = [ChatMessage::user().content("Hi").build()];
        let err = provider.chat(&messages).await.unwrap_err();

        assert!(matches!(err, ChainError::AuthError(_)));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn provider_http_error_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(529).body("overloaded");
        });

        let provider = client_for(&server);
        let messages = [ChatMessage::user().content("Hi").build()];
        let err = provider.chat(&messages).await.unwrap_err();
        assert!(matches!(err, ChainError::HttpError(_)));
    }
}
