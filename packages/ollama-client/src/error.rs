//! Error types for the Ollama client.

use thiserror::Error;

/// Result type for Ollama client operations.
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Ollama client errors.
///
/// Per-line decode failures inside a stream are not errors; they are
/// logged and skipped by the stream decoder.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// Configuration error (invalid base URL, empty model)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure (connection refused, reset, timeout, broken stream)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status before any content was streamed
    #[error("Ollama API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Parse error (invalid JSON in a non-streaming response)
    #[error("Parse error: {0}")]
    Parse(String),
}
