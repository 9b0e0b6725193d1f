use anyhow::{Context, Result};
use initiatives::{FirecrawlIngestor, SecretString};
use ollama_client::OllamaClient;
use std::env;

/// Default generation model.
pub const DEFAULT_MODEL: &str = ollama_client::DEFAULT_MODEL;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub firecrawl_api_key: Option<SecretString>,
    pub firecrawl_base_url: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            firecrawl_api_key: var("FIRECRAWL_API_KEY").map(SecretString::from),
            firecrawl_base_url: var("FIRECRAWL_BASE_URL"),
            ollama_url: var("OLLAMA_URL")
                .unwrap_or_else(|| ollama_client::DEFAULT_BASE_URL.to_string()),
            ollama_model: var("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// The model to use, preferring the command-line value.
    pub fn model<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.filter(|m| !m.trim().is_empty())
            .unwrap_or(&self.ollama_model)
    }

    /// Firecrawl ingestor; fails if no API key is configured.
    pub fn firecrawl(&self) -> Result<FirecrawlIngestor> {
        let api_key = self
            .firecrawl_api_key
            .clone()
            .context("FIRECRAWL_API_KEY must be set to crawl websites")?;

        let mut ingestor =
            FirecrawlIngestor::new(api_key).context("Failed to create Firecrawl client")?;
        if let Some(base_url) = &self.firecrawl_base_url {
            ingestor = ingestor.with_base_url(base_url);
        }
        Ok(ingestor)
    }

    pub fn ollama(&self) -> Result<OllamaClient> {
        OllamaClient::new(&self.ollama_url).context("Failed to create Ollama client")
    }
}
