//! Response normalization - recovers a JSON object from a model's free-text reply.
//!
//! Models are instructed to return bare JSON, but in practice wrap it in
//! markdown fences, prepend commentary, or return prose. Extraction runs a
//! fixed sequence of repair stages and parses the survivor. If no stage
//! yields an object carrying the caller's required keys, the caller-supplied
//! fallback is returned instead; a bad model reply never propagates as an
//! error past this layer.

use serde_json::{Map, Value};
use tracing::warn;

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Slices to the substring spanning the first `{` through the last `}`.
/// Returns the input unchanged when no such span exists; this defends
/// against commentary the model added around the object despite
/// instructions.
pub fn slice_to_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(open), Some(close)) if close > open => &text[open..=close],
        _ => text,
    }
}

/// Runs the repair stages in order and attempts a parse of the survivor.
/// Returns `None` when the text contains no parseable JSON object.
pub fn extract_object(raw: &str) -> Option<Map<String, Value>> {
    let candidate = slice_to_object(strip_code_fences(raw.trim()));
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Normalizes a raw model reply into a JSON object guaranteed to carry
/// `required_keys`. On any extraction or validation failure the
/// caller-supplied `fallback` is returned; the raw text and the reason are
/// logged for diagnostics.
pub fn normalize(
    raw: &str,
    required_keys: &[&str],
    fallback: Map<String, Value>,
) -> Map<String, Value> {
    match extract_object(raw) {
        Some(map) => {
            let missing: Vec<&str> = required_keys
                .iter()
                .filter(|k| !map.contains_key(**k))
                .copied()
                .collect();
            if missing.is_empty() {
                map
            } else {
                warn!(
                    "Normalization fallback: reply missing required keys {:?}. Raw reply: {}",
                    missing, raw
                );
                fallback
            }
        }
        None => {
            warn!("Normalization fallback: no JSON object in reply. Raw reply: {raw}");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("question".to_string(), json!("fallback question"));
        map.insert("interview_status".to_string(), json!("continue"));
        map
    }

    #[test]
    fn test_strip_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_unclosed_fence() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_slice_to_object_trims_surrounding_prose() {
        let input = "Sure! Here is the JSON: {\"a\": 1} Hope that helps.";
        assert_eq!(slice_to_object(input), "{\"a\": 1}");
    }

    #[test]
    fn test_slice_to_object_no_braces_is_identity() {
        assert_eq!(slice_to_object("no json here"), "no json here");
    }

    #[test]
    fn test_slice_to_object_reversed_braces_is_identity() {
        assert_eq!(slice_to_object("} backwards {"), "} backwards {");
    }

    #[test]
    fn test_extract_fenced_object() {
        let raw = "```json\n{\"question\": \"Q?\", \"interview_status\": \"continue\"}\n```";
        let map = extract_object(raw).expect("fenced object must parse");
        assert_eq!(map["question"], "Q?");
        assert_eq!(map["interview_status"], "continue");
    }

    #[test]
    fn test_extract_object_with_leading_and_trailing_prose() {
        let raw = "Of course. {\"ats_score\": 75, \"status\": \"success\"} Let me know!";
        let map = extract_object(raw).expect("prose-wrapped object must parse");
        assert_eq!(map["ats_score"], 75);
    }

    #[test]
    fn test_extract_rejects_top_level_array() {
        assert!(extract_object("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_normalize_valid_reply_passes_through() {
        let raw = "```json\n{\"question\": \"Q?\", \"interview_status\": \"continue\"}\n```";
        let map = normalize(raw, &["question", "interview_status"], fallback());
        assert_eq!(map["question"], "Q?");
        assert_eq!(map["interview_status"], "continue");
    }

    #[test]
    fn test_normalize_unparsable_reply_returns_fallback() {
        let map = normalize("I cannot comply.", &["question"], fallback());
        assert_eq!(map["question"], "fallback question");
    }

    #[test]
    fn test_normalize_empty_reply_returns_fallback() {
        let map = normalize("", &["question"], fallback());
        assert_eq!(map["question"], "fallback question");
    }

    #[test]
    fn test_normalize_missing_required_key_returns_fallback() {
        // Parses fine but lacks interview_status, so it is treated as a failure
        let raw = "{\"question\": \"Q?\"}";
        let map = normalize(raw, &["question", "interview_status"], fallback());
        assert_eq!(map["question"], "fallback question");
    }

    #[test]
    fn test_normalize_extra_keys_are_preserved() {
        let raw = "{\"question\": \"Q?\", \"interview_status\": \"complete\", \"final_score\": 90}";
        let map = normalize(raw, &["question", "interview_status"], fallback());
        assert_eq!(map["final_score"], 90);
    }
}
