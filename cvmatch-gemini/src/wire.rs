//! Request and response fragments shared by both Gemini endpoints.

use serde::{Deserialize, Serialize};

/// Base URL of the Gemini REST API.
pub(crate) const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Full endpoint URL for a bare model id, e.g.
/// `.../models/gemini-2.5-flash:generateContent`.
pub(crate) fn model_url(model: &str, endpoint: &str) -> String {
    format!("{GEMINI_BASE_URL}/models/{model}:{endpoint}")
}

/// Resource name of a bare model id, e.g. `models/gemini-embedding-001`.
pub(crate) fn model_resource(model: &str) -> String {
    format!("models/{model}")
}

/// One piece of content. Non-text parts deserialize with an empty `text` and
/// drop out of the concatenated result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: String,
}

/// A content block: parts plus an optional role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    /// A user-role content block holding one text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self { parts: vec![Part { text: text.into() }], role: Some("user".to_string()) }
    }

    /// A role-less content block, as embedding requests expect.
    pub fn bare(text: impl Into<String>) -> Self {
        Self { parts: vec![Part { text: text.into() }], role: None }
    }

    /// Concatenated text of every part.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Standard Google API error envelope.
#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}

/// Pull the human-readable message out of an error body, falling back to the
/// raw body when it is not the standard envelope.
pub(crate) fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}
