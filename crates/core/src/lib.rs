pub mod domain;
pub mod llm;
pub mod recommend;
pub mod storage;

pub mod config {
    use crate::llm::Provider;
    use anyhow::Context;

    const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
    const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
    const DEFAULT_OLLAMA_MODEL: &str = "deepseek-r1:14b";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub ai_provider: Provider,
        pub gemini_api_key: Option<String>,
        pub gemini_model: String,
        pub gemini_base_url: String,
        pub ollama_host: String,
        pub ollama_model: String,
        pub llm_timeout_secs: Option<u64>,
        pub database_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let ai_provider = resolve_provider(non_empty_var("AI_PROVIDER"))?;

            Ok(Self {
                ai_provider,
                gemini_api_key: non_empty_var("GEMINI_API_KEY"),
                gemini_model: non_empty_var("GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                gemini_base_url: non_empty_var("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                ollama_host: non_empty_var("OLLAMA_HOST")
                    .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
                ollama_model: non_empty_var("OLLAMA_MODEL")
                    .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok()),
                database_url: std::env::var("DATABASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    // Unset or blank selects Ollama.
    fn resolve_provider(raw: Option<String>) -> anyhow::Result<Provider> {
        match raw {
            Some(raw) => raw
                .parse::<Provider>()
                .with_context(|| format!("invalid AI_PROVIDER: {raw}")),
            None => Ok(Provider::Ollama),
        }
    }

}
