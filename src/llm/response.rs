//! Response handling and JSON recovery
//!
//! Models reply with free-form text; the JSON object the client contract
//! needs may be wrapped in Markdown code fences or surrounded by prose.
//! This module digs it out.

use serde_json::Value;

/// Error preview maximum length
const ERROR_PREVIEW_LENGTH: usize = 500;

/// Strip markdown code fences (```json / ```) around a reply.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();

    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.trim_start())
        .unwrap_or(trimmed);

    without_prefix
        .strip_suffix("```")
        .map(|s| s.trim_end())
        .unwrap_or(without_prefix)
        .trim()
}

/// Recover a JSON object from a free-form model reply.
///
/// Order of attempts:
/// 1. parse the fence-stripped reply as-is
/// 2. parse the slice from the first `{` to the last `}`
///
/// Returns `None` when no object can be recovered or the recovered value
/// is not a JSON object.
pub fn recover_json_object(response: &str) -> Option<Value> {
    let cleaned = strip_code_fences(response);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(cleaned)
        && value.is_object()
    {
        return Some(value);
    }

    // Prose around the object: cut from first { to last }
    let (start, end) = (cleaned.find('{')?, cleaned.rfind('}')?);
    if start >= end {
        return None;
    }

    serde_json::from_str::<Value>(&cleaned[start..=end])
        .ok()
        .filter(Value::is_object)
}

/// Truncate string for error preview (safe handling of multibyte characters)
pub fn truncate_for_preview(s: &str) -> String {
    if s.len() <= ERROR_PREVIEW_LENGTH {
        return s.to_string();
    }
    let boundary = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= ERROR_PREVIEW_LENGTH)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..boundary])
}
