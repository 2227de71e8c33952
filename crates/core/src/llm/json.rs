use serde_json::Value;

/// Removes the first "```json" marker and then the first remaining "```" marker, then trims.
///
/// This is deliberately not a fence parser: a completion with prose before the fence, or with
/// several fenced blocks, is left mostly intact and will fail to parse.
pub fn strip_markdown_fence(text: &str) -> String {
    text.replacen("```json", "", 1)
        .replacen("```", "", 1)
        .trim()
        .to_string()
}

/// The `response` field of a local-model reply, classified before any structural checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseField {
    /// Text that still has to go through a JSON parse.
    Encoded(String),
    /// A value the server already decoded for us.
    Structured(Value),
}

impl ResponseField {
    /// Returns `None` for an absent or empty field (`null`, `""`, `false`, `0`).
    pub fn classify(field: Option<&Value>) -> Option<Self> {
        match field? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) => Some(ResponseField::Encoded(s.clone())),
            other => Some(ResponseField::Structured(other.clone())),
        }
    }

    pub fn into_value(self) -> Result<Value, serde_json::Error> {
        match self {
            ResponseField::Encoded(text) => serde_json::from_str(&text),
            ResponseField::Structured(value) => Ok(value),
        }
    }
}
