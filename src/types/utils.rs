//! Shared helpers for loosely-typed stage results and prompt text.
//!
//! ## JSON Extraction Helpers
//!
//! Stage results are whatever JSON the model produced, so every read is
//! best-effort:
//! - `json_string`, `json_string_or`, `json_display` - Extract strings
//! - `json_array` - Borrow arrays

use serde_json::Value;

// =============================================================================
// JSON Value Extraction Helpers
// =============================================================================

/// Placeholder rendered for fields a stage did not produce.
pub const UNKNOWN: &str = "Unknown";

/// Extract string from JSON value by key.
#[inline]
pub fn json_string(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

/// Extract string with default value.
#[inline]
pub fn json_string_or(value: &Value, key: &str, default: &str) -> String {
    json_string(value, key).unwrap_or_else(|| default.to_string())
}

/// Borrow an array by key, empty when absent or of another type.
#[inline]
pub fn json_array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Render a field for prompts and reports.
///
/// Strings are inserted verbatim, other JSON is pretty-printed and missing
/// or null fields become [`UNKNOWN`].
pub fn json_display(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_else(|_| UNKNOWN.into()),
    }
}

/// Pretty-print a whole value, `{}` when serialization fails.
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

// =============================================================================
// String Utilities
// =============================================================================

/// Capitalize the first character and lowercase the rest.
#[inline]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

/// Keep the first `max_chars` characters of `text`.
///
/// Counts chars, not bytes, so multi-byte source never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_string_helpers() {
        let v = json!({"programName": "ORDENTRY", "count": 3});
        assert_eq!(json_string(&v, "programName").as_deref(), Some("ORDENTRY"));
        assert_eq!(json_string(&v, "count"), None);
        assert_eq!(json_string_or(&v, "missing", "Unknown"), "Unknown");
    }

    #[test]
    fn test_json_display_placeholders() {
        let v = json!({"purpose": "Order entry", "rules": ["a"], "author": null});
        assert_eq!(json_display(&v, "purpose"), "Order entry");
        assert_eq!(json_display(&v, "author"), UNKNOWN);
        assert_eq!(json_display(&v, "missing"), UNKNOWN);
        assert!(json_display(&v, "rules").contains("\"a\""));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("order"), "Order");
        assert_eq!(capitalize_first("ENTRY"), "Entry");
        assert_eq!(capitalize_first(""), "");
    }
}
