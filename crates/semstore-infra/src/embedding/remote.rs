//! OpenAI-compatible remote embedding provider.
//!
//! One provider type serves every vendor exposing the `/embeddings`
//! endpoint shape -- OpenAI, Google Gemini (OpenAI-compatible beta
//! endpoint), Mistral -- via configurable base URLs. Wrong-dimension
//! responses are rejected at this boundary rather than stored.

use serde::{Deserialize, Serialize};

use semstore_core::embedding::EmbeddingProvider;
use semstore_types::config::EmbeddingSettings;
use semstore_types::error::SemanticStoreError;

/// Remote embedding provider over an OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key.
pub struct RemoteEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl RemoteEmbeddingProvider {
    /// Create a provider from settings plus an API key.
    pub fn new(settings: &EmbeddingSettings, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: settings.model.clone(),
            dimension: settings.dimension,
        }
    }

    /// Create an OpenAI provider.
    ///
    /// Uses `https://api.openai.com/v1` as the base URL.
    pub fn openai(api_key: &str, model: &str, dimension: usize) -> Self {
        Self::new(
            &EmbeddingSettings {
                base_url: "https://api.openai.com/v1".to_string(),
                model: model.to_string(),
                dimension,
            },
            api_key,
        )
    }

    /// Create a Google Gemini provider (OpenAI-compatible beta endpoint).
    ///
    /// Uses `https://generativelanguage.googleapis.com/v1beta/openai` as
    /// the base URL.
    pub fn gemini(api_key: &str, model: &str, dimension: usize) -> Self {
        Self::new(
            &EmbeddingSettings {
                base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
                model: model.to_string(),
                dimension,
            },
            api_key,
        )
    }
}

impl EmbeddingProvider for RemoteEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticStoreError> {
        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| SemanticStoreError::Provider(format!("embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticStoreError::Provider(format!(
                "embedding request returned {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            SemanticStoreError::Provider(format!("malformed embedding response: {e}"))
        })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| {
                SemanticStoreError::Provider("provider returned no embeddings".to_string())
            })?
            .embedding;

        if embedding.len() != self.dimension {
            return Err(SemanticStoreError::Provider(format!(
                "provider returned {} dimensions, expected {}",
                embedding.len(),
                self.dimension
            )));
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let provider = RemoteEmbeddingProvider::new(
            &EmbeddingSettings {
                base_url: "http://localhost:8080/v1/".to_string(),
                model: "test-model".to_string(),
                dimension: 8,
            },
            "key",
        );
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.model_name(), "test-model");
        assert_eq!(provider.dimension(), 8);
    }

    #[test]
    fn test_gemini_defaults() {
        let provider = RemoteEmbeddingProvider::gemini("key", "gemini-embedding-001", 3072);
        assert!(provider.base_url.contains("generativelanguage"));
        assert_eq!(provider.dimension(), 3072);
    }

    #[test]
    fn test_request_serialization() {
        let request = EmbeddingRequest {
            model: "gemini-embedding-001",
            input: "invoice pending approval",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gemini-embedding-001");
        assert_eq!(json["input"], "invoice pending approval");
    }
}
