pub mod error;
pub mod gemini;
pub mod json;
pub mod ollama;

use crate::config::Settings;
use crate::llm::error::LlmError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Ollama,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "ollama" => Ok(Provider::Ollama),
            other => anyhow::bail!("unknown AI provider {other:?} (expected gemini or ollama)"),
        }
    }
}

/// One prompt in, one parsed JSON value out. Implementations own their transport and any
/// provider-specific prompt suffix; callers never see raw completion text.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn generate(&self, prompt: &str) -> Result<serde_json::Value, LlmError>;
}

/// Resolves the configured provider once. The returned client is shared for the life of the
/// process.
pub fn client_from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match settings.ai_provider {
        Provider::Gemini => Arc::new(gemini::GeminiClient::from_settings(settings)?),
        Provider::Ollama => Arc::new(ollama::OllamaClient::from_settings(settings)?),
    };
    tracing::info!(provider = %client.provider(), "LLM provider configured");
    Ok(client)
}

pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> anyhow::Result<reqwest::Client> {
    use anyhow::Context;

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder.build().context("failed to build reqwest client")
}
