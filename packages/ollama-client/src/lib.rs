//! Ollama REST API client
//!
//! Minimal client for a local Ollama server: one-shot and streamed text
//! generation plus model listing. Streamed replies arrive as
//! newline-delimited JSON and are aggregated through a [`FragmentSink`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ollama_client::OllamaClient;
//!
//! let client = OllamaClient::from_env()?;
//!
//! // Print fragments as they arrive, keep the full reply
//! let reply = client
//!     .generate_with("llama3", "Why is the sky blue?", |f: &str| print!("{f}"))
//!     .await?;
//! ```

pub mod error;
pub mod prompts;
pub mod streaming;
pub mod types;

pub use error::{OllamaError, Result};
pub use prompts::{analysis_prompt, DEFAULT_ANALYSIS_QUESTION};
pub use streaming::{aggregate, aggregate_stream, FragmentSink, GenerateStream, LineBuffer};
pub use types::{GenerateChunk, GenerateOptions, GenerateRequest};

use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::{debug, warn};

/// Local Ollama server address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// Model used when none is installed or listing fails.
pub const DEFAULT_MODEL: &str = "llama3";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Ollama API client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http_client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl OllamaClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let parsed = Url::parse(&base_url)
            .map_err(|e| OllamaError::Config(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(OllamaError::Config(format!(
                "Ollama URL must be http or https: {}",
                base_url
            )));
        }

        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| OllamaError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    /// Create from environment variable `OLLAMA_URL`, falling back to the
    /// local default.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("OLLAMA_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Timeout for non-streaming requests. Streamed replies are bounded
    /// only by the connect timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Map a non-success status to [`OllamaError::Api`].
    async fn check(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, error = %body, "Ollama {} failed", what);
        Err(OllamaError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// One-shot generation; returns the whole reply.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let request = GenerateRequest::new(model, prompt);

        let response = self
            .http_client
            .post(self.endpoint("/generate"))
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Ollama request failed");
                OllamaError::Transport(e.to_string())
            })?;

        let response = Self::check(response, "generate").await?;

        let body: types::GenerateResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Parse(e.to_string()))?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis(),
            "Ollama generate"
        );

        Ok(body.response)
    }

    /// Streamed generation.
    ///
    /// Fails before yielding anything if the server cannot be reached or
    /// answers with a non-success status.
    pub async fn generate_stream(&self, model: &str, prompt: &str) -> Result<GenerateStream> {
        let request = GenerateRequest::new(model, prompt).streaming();

        debug!(model = %model, prompt_chars = prompt.len(), "Starting Ollama stream");

        let response = self
            .http_client
            .post(self.endpoint("/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Ollama streaming request failed");
                OllamaError::Transport(e.to_string())
            })?;

        let response = Self::check(response, "streaming generate").await?;

        Ok(GenerateStream::new(response.bytes_stream()))
    }

    /// Streamed generation with each fragment delivered to `sink` as it
    /// arrives. Returns the concatenated reply.
    pub async fn generate_with<K>(&self, model: &str, prompt: &str, sink: K) -> Result<String>
    where
        K: FragmentSink,
    {
        let stream = self.generate_stream(model, prompt).await?;
        aggregate(stream, sink).await
    }

    /// Names of locally installed models.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .http_client
            .get(self.endpoint("/tags"))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| OllamaError::Transport(e.to_string()))?;

        let response = Self::check(response, "list models").await?;

        let tags: types::TagsResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::Parse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Installed models, or `["llama3"]` if the server cannot be asked.
    pub async fn available_models_or_default(&self) -> Vec<String> {
        match self.list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "Could not list Ollama models, using default");
                vec![DEFAULT_MODEL.to_string()]
            }
        }
    }

    /// Ask the model about a website, streaming the answer to `sink`.
    pub async fn analyze_site<K>(
        &self,
        model: &str,
        url: &str,
        question: &str,
        sink: K,
    ) -> Result<String>
    where
        K: FragmentSink,
    {
        let prompt = analysis_prompt(url, question);
        self.generate_with(model, &prompt, sink).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OllamaClient::new("http://localhost:11434/")
            .unwrap()
            .with_timeout(Duration::from_secs(5));

        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.endpoint("/generate"), "http://localhost:11434/api/generate");
        assert_eq!(client.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            OllamaClient::new("not a url"),
            Err(OllamaError::Config(_))
        ));
        assert!(matches!(
            OllamaClient::new("ftp://localhost:11434"),
            Err(OllamaError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_falls_back_to_default_model() {
        let client = OllamaClient::new("http://127.0.0.1:1").unwrap();
        assert_eq!(client.available_models_or_default().await, vec!["llama3"]);
    }
}
