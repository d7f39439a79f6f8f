//! OpenAI chat completion provider adapter.
//!
//! Streams completions from `/chat/completions` of OpenAI or any compatible
//! server.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::sse::SseStreamParser;
use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{ChatTurn, OpenAiConfig};
use crate::domain::ports::{FragmentStream, GenerationProvider};
use crate::infrastructure::logging::{redact_secret, scrub_secret};

/// OpenAI chat completion provider.
pub struct OpenAiChatProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiChatProvider {
    /// Create a provider from the shared OpenAI settings
    ///
    /// Fails with [`RagError::Configuration`] when no API key is available.
    pub fn new(config: &OpenAiConfig) -> RagResult<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            RagError::Configuration(
                "OpenAI API key not set. Set OPENAI_API_KEY env var or configure openai.api_key."
                    .to_string(),
            )
        })?;

        // Connect timeout only: the body streams for as long as generation runs.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        tracing::debug!(
            model = %config.chat_model,
            api_key = %redact_secret(&api_key),
            "Created chat provider"
        );

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.chat_model.clone(),
        })
    }

    /// Model used for completions
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationProvider for OpenAiChatProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn stream(&self, turns: &[ChatTurn], temperature: f32) -> RagResult<FragmentStream> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            temperature,
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RagError::Generation(format!("Chat API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .map(|body| scrub_secret(&body, &self.api_key))
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(RagError::Generation(format!(
                "Chat API returned {status}: {body}"
            )));
        }

        tracing::debug!(model = %self.model, turns = turns.len(), "Chat stream opened");

        Ok(Box::pin(SseStreamParser::new(response.bytes_stream())))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    stream: bool,
}
