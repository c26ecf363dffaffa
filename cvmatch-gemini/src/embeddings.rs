//! Gemini embedding provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use cvmatch_core::{EmbeddingProvider, MatchError, Result};

use crate::wire::{error_detail, model_resource, model_url, Content};

/// The default Gemini embedding model.
const DEFAULT_MODEL: &str = "gemini-embedding-001";

/// The default dimensionality for `gemini-embedding-001`.
const DEFAULT_DIMENSIONS: usize = 3072;

/// An [`EmbeddingProvider`] backed by the Gemini REST API.
///
/// Uses `reqwest` to call the `embedContent` and `batchEmbedContents`
/// endpoints directly, authenticated with the `x-goog-api-key` header.
///
/// # Configuration
///
/// - `model` - defaults to `gemini-embedding-001`.
/// - `dimensions` - optional output-dimensionality override.
/// - `api_key` - from the constructor or the `GOOGLE_API_KEY` environment
///   variable (`GEMINI_API_KEY` is accepted as a fallback).
///
/// # Example
///
/// ```rust,ignore
/// use cvmatch_gemini::GeminiEmbeddings;
///
/// let embeddings = GeminiEmbeddings::from_env()?;
/// let vector = embeddings.embed("Ten years of Rust experience").await?;
/// ```
pub struct GeminiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API to truncate the returned vectors.
    request_dimensions: Option<usize>,
}

impl GeminiEmbeddings {
    /// Create a new provider with the given API key.
    ///
    /// Uses the default model (`gemini-embedding-001`) and dimensions (3072).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(MatchError::Config("Gemini API key must not be empty".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Create a new provider from `GOOGLE_API_KEY`, falling back to
    /// `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| {
                MatchError::Config("GOOGLE_API_KEY environment variable not set".to_string())
            })?;
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensionality.
    ///
    /// When set, the API truncates returned vectors to this size. This also
    /// updates the value reported by
    /// [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| MatchError::Embedding {
            provider: "Gemini".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "Gemini",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let request_body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: model_resource(&self.model),
                    content: Content::bare(*text),
                    output_dimensionality: self.request_dimensions,
                })
                .collect(),
        };

        let response = self
            .client
            .post(model_url(&self.model, "batchEmbedContents"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "request failed");
                MatchError::Embedding {
                    provider: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(body);

            error!(provider = "Gemini", %status, "API error");
            return Err(MatchError::Embedding {
                provider: "Gemini".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let batch_response: BatchEmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse response");
            MatchError::Embedding {
                provider: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(batch_response.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn batch_request_carries_model_resource_per_entry() {
        let request = BatchEmbedRequest {
            requests: vec![EmbedContentRequest {
                model: model_resource("gemini-embedding-001"),
                content: Content::bare("first chunk"),
                output_dimensionality: None,
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "requests": [{
                    "model": "models/gemini-embedding-001",
                    "content": {"parts": [{"text": "first chunk"}]}
                }]
            })
        );
    }

    #[test]
    fn output_dimensionality_is_camel_cased_when_set() {
        let request = EmbedContentRequest {
            model: model_resource("gemini-embedding-001"),
            content: Content::bare("x"),
            output_dimensionality: Some(768),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["outputDimensionality"], json!(768));
    }

    #[test]
    fn batch_response_vectors_parse_in_order() {
        let response: BatchEmbedResponse = serde_json::from_value(json!({
            "embeddings": [
                {"values": [0.1, 0.2, 0.3]},
                {"values": [0.4, 0.5, 0.6]}
            ]
        }))
        .unwrap();
        let vectors: Vec<Vec<f32>> = response.embeddings.into_iter().map(|e| e.values).collect();
        assert_eq!(vectors, vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]);
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(GeminiEmbeddings::new(""), Err(MatchError::Config(_))));
    }

    #[test]
    fn builder_style_overrides_apply() {
        let embeddings =
            GeminiEmbeddings::new("key").unwrap().with_model("gemini-embedding-001").with_dimensions(768);
        assert_eq!(embeddings.dimensions(), 768);
        assert_eq!(embeddings.request_dimensions, Some(768));
    }
}
