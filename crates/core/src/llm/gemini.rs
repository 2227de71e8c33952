use crate::config::Settings;
use crate::llm::error::LlmError;
use crate::llm::json;
use crate::llm::{build_http_client, LlmClient, Provider};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Hosted generative-language API. The prompt goes out untouched; the completion text may come
/// back wrapped in a markdown fence.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_gemini_api_key()?.to_string();
        let http = build_http_client(settings.llm_timeout_secs)?;
        Ok(Self::new(
            http,
            api_key,
            settings.gemini_base_url.clone(),
            settings.gemini_model.clone(),
        ))
    }

    pub fn new(http: reqwest::Client, api_key: String, base_url: String, model: String) -> Self {
        Self {
            http,
            api_key,
            base_url,
            model,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, LlmError> {
        let req = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(provider = %Provider::Gemini, model = %self.model, "LLM request issued");
        let res = self
            .http
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| provider_error("request", e.to_string(), None))?;

        let status = res.status();
        tracing::debug!(provider = %Provider::Gemini, %status, "LLM response status");
        let text = res
            .text()
            .await
            .map_err(|e| provider_error("read_body", e.to_string(), None))?;

        if !status.is_success() {
            return Err(provider_error(
                "http",
                format!("status={status}"),
                Some(text),
            ));
        }

        let parsed = serde_json::from_str::<GenerateContentResponse>(&text).map_err(|e| {
            provider_error(
                "decode_body",
                format!("unexpected response shape: {e}"),
                Some(text.clone()),
            )
        })?;

        match parsed.completion_text() {
            Some(completion) => Ok(completion),
            None => Err(provider_error(
                "empty_completion",
                "response carried no text parts".to_string(),
                Some(text),
            )),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate(&self, prompt: &str) -> Result<Value, LlmError> {
        let completion = self.generate_content(prompt).await?;
        tracing::trace!(provider = %Provider::Gemini, raw = %completion, "LLM raw completion");
        parse_completion(&completion)
    }
}

fn parse_completion(completion: &str) -> Result<Value, LlmError> {
    let cleaned = json::strip_markdown_fence(completion);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => {
            tracing::debug!(provider = %Provider::Gemini, "LLM completion parsed");
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(provider = %Provider::Gemini, error = %e, "LLM completion is not JSON");
            Err(LlmError::Parse {
                provider: Provider::Gemini,
                detail: e.to_string(),
                raw_output: Some(completion.to_string()),
            })
        }
    }
}

fn provider_error(stage: &'static str, detail: String, raw_output: Option<String>) -> LlmError {
    tracing::warn!(provider = %Provider::Gemini, stage, %detail, "LLM provider call failed");
    LlmError::Provider {
        provider: Provider::Gemini,
        stage,
        detail,
        raw_output,
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn completion_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
