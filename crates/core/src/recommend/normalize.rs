use serde::de::DeserializeOwned;
use serde_json::Value;

pub const MUSIC_KEYS: &[&str] = &["music_recommendations", "music", "recommendations", "songs"];
pub const BOOK_KEYS: &[&str] = &["book_recommendations", "books", "recommendations"];

/// Finds the list a model meant to return.
///
/// A top-level array is taken as-is. Otherwise the first of `candidate_keys` whose value is an
/// array wins; lists under lower-priority keys are never merged in. Anything else yields an
/// empty list, which callers treat as a failed task.
pub fn extract_list<'a>(raw: &'a Value, candidate_keys: &[&str]) -> &'a [Value] {
    if let Value::Array(items) = raw {
        return items;
    }
    candidate_keys
        .iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// `extract_list` followed by a typed decode. Items that do not decode are dropped.
pub fn extract_items<T: DeserializeOwned>(raw: &Value, candidate_keys: &[&str]) -> Vec<T> {
    extract_list(raw, candidate_keys)
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed list item");
                None
            }
        })
        .collect()
}
