//! Ollama API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Generate
// =============================================================================

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model to use (e.g., "llama3")
    pub model: String,

    /// Prompt text
    pub prompt: String,

    /// Stream newline-delimited JSON records instead of one body
    pub stream: bool,

    /// Sampling options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

impl GenerateRequest {
    /// Create a non-streaming request.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            options: None,
        }
    }

    /// Request a streamed reply.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(Default::default).temperature = Some(temperature);
        self
    }

    /// Limit the number of generated tokens.
    pub fn num_predict(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(Default::default).num_predict = Some(num_predict);
        self
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// One record of a streamed generate reply.
///
/// Only `response` and `done` matter; other fields (`model`, `created_at`,
/// timing counters) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateChunk {
    /// Incremental text fragment
    #[serde(default)]
    pub response: Option<String>,

    /// Final record marker
    #[serde(default)]
    pub done: bool,
}

impl GenerateChunk {
    /// The fragment, if present and non-empty.
    pub fn fragment(&self) -> Option<&str> {
        self.response.as_deref().filter(|r| !r.is_empty())
    }
}

/// Non-streaming generate response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

// =============================================================================
// Models
// =============================================================================

/// Response body for `GET /api/tags`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// A locally installed model.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModelTag {
    pub name: String,
}
