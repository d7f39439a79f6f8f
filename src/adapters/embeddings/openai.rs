//! OpenAI embedding provider adapter.
//!
//! Calls the `/embeddings` endpoint of OpenAI or any compatible server
//! (Azure OpenAI, local inference servers).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::OpenAiConfig;
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::logging::scrub_secret;

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
    max_batch_size: usize,
}

impl OpenAiEmbeddingProvider {
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

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension,
            max_batch_size: config.embedding_batch_size.max(1),
        })
    }

    async fn call_embeddings_api(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);

        let request_body = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("Embedding API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .map(|body| scrub_secret(&body, &self.api_key))
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(RagError::Embedding(format!(
                "Embedding API returned {status}: {body}"
            )));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to parse embedding response: {e}")))?;

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        if data.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "Embedding API returned {} vectors for {} inputs",
                data.len(),
                texts.len()
            )));
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.max_batch_size) {
            tracing::debug!(model = %self.model, batch = batch.len(), "Requesting embeddings");
            vectors.extend(self.call_embeddings_api(batch).await?);
        }

        Ok(vectors)
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_config() {
        let config = OpenAiConfig::default()
            .with_api_key("test-key")
            .with_base_url("http://localhost:1234/v1/");
        let provider = OpenAiEmbeddingProvider::new(&config).unwrap();

        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.dimension(), 1536);
        assert_eq!(provider.base_url, "http://localhost:1234/v1");
        assert_eq!(provider.model, "text-embedding-3-small");
    }

    #[test]
    fn test_missing_api_key() {
        temp_env::with_var_unset("OPENAI_API_KEY", || {
            let result = OpenAiEmbeddingProvider::new(&OpenAiConfig::default());
            assert!(matches!(result, Err(RagError::Configuration(_))));
        });
    }

    #[test]
    fn test_request_serialization() {
        let input = vec!["a".to_string(), "b".to_string()];
        let body = EmbeddingsRequest {
            model: "m",
            input: &input,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["input"][1], "b");
    }
}
