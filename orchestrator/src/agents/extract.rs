//! Tolerant JSON extraction from LLM responses
//!
//! Models wrap JSON in markdown fences or surround it with prose. Extraction
//! strips that; structural validation stays with each agent's parser.

use serde::de::DeserializeOwned;

use super::StageError;

/// Locate the JSON object inside a model response.
///
/// Tries, in order: the whole trimmed response, a fenced ```json block, and
/// the span from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') && inner.ends_with('}') {
                return Some(inner);
            }
        }
    }

    let first = trimmed.find('{')?;
    let last = trimmed.rfind('}')?;
    if last > first {
        Some(&trimmed[first..=last])
    } else {
        None
    }
}

/// Extract and deserialize the JSON object from a response.
pub fn parse_object<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, StageError> {
    let json = extract_json(text)
        .ok_or_else(|| StageError::Parse(format!("no JSON object found in {what} response")))?;
    serde_json::from_str(json).map_err(|e| StageError::Parse(format!("{what} response: {e}")))
}
