//! Gemini narrative generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use cvmatch_core::{AnalysisGenerator, MatchError, Result};

use crate::wire::{error_detail, model_url, Content};

/// The default Gemini generative model.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.2;

/// An [`AnalysisGenerator`] backed by the Gemini `generateContent` endpoint.
///
/// # Configuration
///
/// - `model` - defaults to `gemini-2.5-flash`.
/// - `temperature` - defaults to 0.2.
/// - `api_key` - from the constructor or the `GOOGLE_API_KEY` environment
///   variable (`GEMINI_API_KEY` is accepted as a fallback).
///
/// # Example
///
/// ```rust,ignore
/// use cvmatch_gemini::GeminiGenerator;
///
/// let generator = GeminiGenerator::from_env()?.with_temperature(0.2);
/// let narrative = generator.generate(&prompt).await?;
/// ```
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiGenerator {
    /// Create a new generator with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(MatchError::Config("Gemini API key must not be empty".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Create a new generator from `GOOGLE_API_KEY`, falling back to
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

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<Content>,
}

// ── AnalysisGenerator implementation ───────────────────────────────

#[async_trait]
impl AnalysisGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            provider = "Gemini",
            model = %self.model,
            prompt_len = prompt.len(),
            "generating narrative"
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig { temperature: self.temperature },
        };

        let response = self
            .client
            .post(model_url(&self.model, "generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "request failed");
                MatchError::Generation {
                    provider: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(body);

            error!(provider = "Gemini", %status, "API error");
            return Err(MatchError::Generation {
                provider: "Gemini".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let generate_response: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse response");
            MatchError::Generation {
                provider: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let candidate = generate_response.candidates.into_iter().next().ok_or_else(|| {
            MatchError::Generation {
                provider: "Gemini".into(),
                message: "response contained no candidates".into(),
            }
        })?;
        let content = candidate.content.ok_or_else(|| MatchError::Generation {
            provider: "Gemini".into(),
            message: "candidate contained no content".into(),
        })?;
        Ok(content.text())
    }
}
