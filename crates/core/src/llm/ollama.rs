use crate::config::Settings;
use crate::llm::error::LlmError;
use crate::llm::json::ResponseField;
use crate::llm::{build_http_client, LlmClient, Provider};
use serde::Serialize;
use serde_json::Value;

const JSON_ONLY_INSTRUCTION: &str = "IMPORTANT: Respond with ONLY a valid JSON object. Do not include any other text or markdown formatting like ```json.";

/// Local model server speaking the `/api/generate` protocol.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    host: String,
    model: String,
}

impl OllamaClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = build_http_client(settings.llm_timeout_secs)?;
        Ok(Self::new(
            http,
            settings.ollama_host.clone(),
            settings.ollama_model.clone(),
        ))
    }

    pub fn new(http: reqwest::Client, host: String, model: String) -> Self {
        Self { http, host, model }
    }

    fn url(&self) -> String {
        format!("{}/api/generate", self.host.trim_end_matches('/'))
    }

    fn json_prompt(prompt: &str) -> String {
        format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    async fn generate(&self, prompt: &str) -> Result<Value, LlmError> {
        let json_prompt = Self::json_prompt(prompt);
        let req = GenerateRequest {
            model: &self.model,
            prompt: &json_prompt,
            format: "json",
            stream: false,
        };

        tracing::debug!(
            provider = %Provider::Ollama,
            model = %self.model,
            host = %self.host,
            "LLM request issued"
        );
        let res = self
            .http
            .post(self.url())
            .json(&req)
            .send()
            .await
            .map_err(|e| provider_error("request", e.to_string(), None))?;

        let status = res.status();
        tracing::debug!(provider = %Provider::Ollama, %status, "LLM response status");
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

        let reply = serde_json::from_str::<Value>(&text).map_err(|e| {
            provider_error(
                "decode_body",
                format!("reply is not JSON: {e}"),
                Some(text.clone()),
            )
        })?;
        tracing::trace!(provider = %Provider::Ollama, raw = %reply, "LLM raw reply");

        let Some(field) = ResponseField::classify(reply.get("response")) else {
            return Err(provider_error(
                "empty_response",
                "reply has an empty response field".to_string(),
                Some(text),
            ));
        };

        match field.into_value() {
            Ok(value) => {
                tracing::debug!(provider = %Provider::Ollama, "LLM response parsed");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(provider = %Provider::Ollama, error = %e, "LLM response is not JSON");
                let raw_output = reply
                    .get("response")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Err(LlmError::Parse {
                    provider: Provider::Ollama,
                    detail: e.to_string(),
                    raw_output,
                })
            }
        }
    }
}

fn provider_error(stage: &'static str, detail: String, raw_output: Option<String>) -> LlmError {
    tracing::warn!(provider = %Provider::Ollama, stage, %detail, "LLM provider call failed");
    LlmError::Provider {
        provider: Provider::Ollama,
        stage,
        detail,
        raw_output,
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    format: &'static str,
    stream: bool,
}
