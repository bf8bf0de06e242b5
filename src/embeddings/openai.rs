//! OpenAI embeddings API client.

use crate::embeddings::EmbeddingProvider;
use crate::types::{ChatError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

/// Embedding provider backed by the OpenAI embeddings API.
pub struct OpenAiEmbedder {
    api_key: String,
    model: String,
    dimensions: usize,
    client: Client,
}

impl OpenAiEmbedder {
    /// Create an embedder for a model name.
    ///
    /// Dimensions follow the published model table; unknown models assume
    /// 1536.
    pub fn new(api_key: String, model: String) -> Self {
        let dimensions = match model.as_str() {
            "text-embedding-3-large" => 3072,
            "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
            _ => 1536,
        };

        Self {
            api_key,
            model,
            dimensions,
            client: Client::new(),
        }
    }

    async fn request(&self, input: serde_json::Value) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "input": input,
            }))
            .send()
            .await
            .map_err(|e| ChatError::Embedding(format!("embeddings request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable body".to_string());
            return Err(ChatError::Embedding(format!(
                "embeddings API error {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Embedding(format!("invalid embeddings response: {}", e)))?;

        Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request(json!(text)).await?.into_iter().next().ok_or_else(|| {
            ChatError::Embedding("no embedding returned for input".to_string())
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(json!(texts)).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_dimension_table() {
        assert_eq!(
            OpenAiEmbedder::new("k".into(), "text-embedding-3-small".into()).dimensions(),
            1536
        );
        assert_eq!(
            OpenAiEmbedder::new("k".into(), "text-embedding-3-large".into()).dimensions(),
            3072
        );
        assert_eq!(
            OpenAiEmbedder::new("k".into(), "something-else".into()).dimensions(),
            1536
        );
    }
}
