//! JSON recovery from free-text replies.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static JSON_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid JSON span regex"));

/// Parse the span from the first `{` to the last `}`.
///
/// Returns `None` when there is no span or the span is not valid JSON.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let span = JSON_SPAN.find(text)?;
    match serde_json::from_str(span.as_str()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("JSON span did not parse: {}", e);
            None
        }
    }
}

/// Parse a reply that was asked to be JSON only.
///
/// A leading ```` ```json ```` and a trailing fence are dropped, the rest is
/// parsed directly, and the `{...}` span search is the last resort.
pub fn parse_json_response(text: &str) -> Option<Value> {
    serde_json::from_str(strip_json_fence(text))
        .ok()
        .or_else(|| extract_json_object(text))
}

/// Reply text without a leading ```` ```json ```` and a trailing fence
pub fn strip_json_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_single_span_with_prose() {
        let text = "Here is the analysis:\n{\"program_calls\": [\"VALIDATE\"]}\nLet me know!";
        assert_eq!(
            extract_json_object(text),
            Some(json!({"program_calls": ["VALIDATE"]}))
        );
    }

    #[test]
    fn test_fenced_span() {
        let text = "```json\n{\"format_type\": \"free\"}\n```";
        assert_eq!(extract_json_object(text), Some(json!({"format_type": "free"})));
    }

    #[test]
    fn test_no_span() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_two_spans_are_not_recovered() {
        // Greedy span covers both objects and the text between them
        assert_eq!(extract_json_object("{\"a\": 1} and {\"b\": 2}"), None);
    }

    #[test]
    fn test_parse_json_response_fences() {
        assert_eq!(
            parse_json_response("```json\n{\"x\": [1, 2]}\n```"),
            Some(json!({"x": [1, 2]}))
        );
        assert_eq!(parse_json_response("  {\"y\": true}  "), Some(json!({"y": true})));
        assert_eq!(
            parse_json_response("Sure!\n{\"z\": null}"),
            Some(json!({"z": null}))
        );
        assert_eq!(parse_json_response("```json\nnot json\n```"), None);
    }

    #[test]
    fn test_parse_json_response_accepts_top_level_array() {
        assert_eq!(parse_json_response("[1, 2]"), Some(json!([1, 2])));
    }

    proptest! {
        #[test]
        fn prop_single_object_round_trips(
            prefix in "[a-zA-Z .,:\n]{0,40}",
            suffix in "[a-zA-Z .,:\n]{0,40}",
            entries in proptest::collection::btree_map("[a-z_]{1,12}", any::<i64>(), 0..6),
        ) {
            let object = serde_json::to_value(&entries).expect("serializable map");
            let text = format!("{prefix}{object}{suffix}");
            prop_assert_eq!(extract_json_object(&text), Some(object));
        }

        #[test]
        fn prop_text_without_braces_never_parses(text in "[^{}]{0,200}") {
            prop_assert_eq!(extract_json_object(&text), None);
        }
    }
}
