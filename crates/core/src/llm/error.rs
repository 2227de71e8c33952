use crate::llm::Provider;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport failure, non-success status, or a response missing its text payload.
    #[error("LLM provider error (provider={provider}, stage={stage}): {detail}")]
    Provider {
        provider: Provider,
        stage: &'static str,
        detail: String,
        raw_output: Option<String>,
    },

    /// Completion text that is not valid JSON after unwrapping.
    #[error("LLM output is not valid JSON (provider={provider}): {detail}")]
    Parse {
        provider: Provider,
        detail: String,
        raw_output: Option<String>,
    },

    /// A list-valued task normalized to zero items.
    #[error("{task} generation returned no usable items")]
    EmptyResult { task: &'static str },
}

impl LlmError {
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            LlmError::Provider { raw_output, .. } | LlmError::Parse { raw_output, .. } => {
                raw_output.as_deref()
            }
            LlmError::EmptyResult { .. } => None,
        }
    }
}
