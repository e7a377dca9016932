//! crates/lingo_core/src/recovery.rs
//!
//! Recovers structured values from free-form model replies.
//!
//! Models are asked to answer with a JSON object, but they wrap it in markdown
//! fences, append commentary, or get cut off mid-array. Recovery runs in two
//! tiers: a strict JSON parse of the de-fenced text, then a line-based fallback
//! over the raw reply. Only when both tiers come up short does it fail, and that
//! failure is the model's fault, so it maps to a 500-class error.

use crate::domain::SuggestionSet;
use crate::ports::PortError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, error};

/// Characters of offending model output kept in logs.
const SAMPLE_CHARS: usize = 200;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("valid fence pattern"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```[ \t]*$").expect("valid fence pattern"));

/// Removes a leading ```` ``` ```` / ```` ```json ```` marker and a trailing
/// ```` ``` ```` marker. Text without an opening fence is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(opening) = OPENING_FENCE.find(trimmed) else {
        return trimmed;
    };
    let body = &trimmed[opening.end()..];
    match CLOSING_FENCE.find(body) {
        Some(closing) => body[..closing.start()].trim(),
        None => body.trim(),
    }
}

/// Parses a JSON object out of a model reply, or `None` if there isn't one.
///
/// The de-fenced text is parsed as-is first; failing that, the span between the
/// first `{` and the last `}` is tried so trailing commentary does not matter.
pub fn recover_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let body = strip_code_fence(text);
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        return Some(map);
    }
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&body[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Pulls the string value of `key` out of a reply that looks like a JSON object
/// but does not parse, e.g. because the model was cut off mid-string.
///
/// The value runs to its closing quote, or to the end of the text when the
/// quote never arrives. An unfinished escape at the cut is dropped.
pub fn salvage_string_field(text: &str, key: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)"#, regex::escape(key));
    let field = Regex::new(&pattern).ok()?;
    let raw = field.captures(strip_code_fence(text))?.get(1)?.as_str();
    let raw = raw.replace('\n', "\\n").replace('\r', "\\r").replace('\t', "\\t");
    let value: String = serde_json::from_str(&format!("\"{}\"", raw)).ok()?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    debug!(key, "Salvaged a string field from malformed JSON");
    Some(value.to_string())
}

/// Recovers exactly `required` non-empty strings from a reply that should look
/// like `{"<key>": ["...", ...]}`.
pub fn recover_list(text: &str, key: &str, required: usize) -> Result<Vec<String>, PortError> {
    if let Some(items) = list_from_json(text, key, required) {
        return Ok(items);
    }
    debug!(key, "Structured parse failed; falling back to line recovery");

    let lines = list_from_lines(text, required);
    if lines.len() == required {
        return Ok(lines);
    }

    let sample: String = text.chars().take(SAMPLE_CHARS).collect();
    error!(
        key,
        required,
        recovered = lines.len(),
        sample = %sample,
        "Could not recover structured output from model reply"
    );
    Err(PortError::Recovery(format!(
        "Expected {} {} in the model reply but recovered {}",
        required,
        key,
        lines.len()
    )))
}

/// Recovers the three reply suggestions.
pub fn recover_suggestions(text: &str) -> Result<SuggestionSet, PortError> {
    let items = recover_list(text, "suggestions", SuggestionSet::SIZE)?;
    SuggestionSet::new(items).ok_or_else(|| {
        PortError::Recovery("Recovered suggestions did not form a valid set".to_string())
    })
}

fn list_from_json(text: &str, key: &str, required: usize) -> Option<Vec<String>> {
    let object = recover_json_object(text)?;
    let array = object.get(key)?.as_array()?;
    let items: Vec<String> = array
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .take(required)
        .collect();
    (items.len() == required).then_some(items)
}

fn looks_like_json_or_fence(line: &str) -> bool {
    line.starts_with('{')
        || line.starts_with('[')
        || line.starts_with('}')
        || line.starts_with(']')
        || line.starts_with("```")
}

fn list_from_lines(text: &str, required: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !looks_like_json_or_fence(line))
        .take(required)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn originals() -> Vec<String> {
        vec![
            "Could you say that again?".to_string(),
            "I'd love to try the noodles.".to_string(),
            "What do you recommend?".to_string(),
        ]
    }

    #[test]
    fn recovers_plain_json() {
        let text = json!({ "suggestions": originals() }).to_string();
        let set = recover_suggestions(&text).expect("recover");
        assert_eq!(set.suggestions(), originals().as_slice());
    }

    #[test]
    fn recovers_fenced_json_with_and_without_language_tag() {
        let body = serde_json::to_string_pretty(&json!({ "suggestions": originals() })).unwrap();
        for fence in ["```json", "```"] {
            let text = format!("{}\n{}\n```", fence, body);
            let set = recover_suggestions(&text).expect("recover fenced");
            assert_eq!(set.into_inner(), originals());
        }
    }

    #[test]
    fn tolerates_trailing_commentary() {
        let text = format!(
            "Sure! {}\nLet me know if you need more.",
            json!({ "suggestions": originals() })
        );
        let set = recover_suggestions(&text).expect("recover");
        assert_eq!(set.into_inner(), originals());
    }

    #[test]
    fn truncates_extra_entries_and_trims() {
        let text = r#"{"suggestions": ["  one ", "", "two", "three", "four"]}"#;
        assert_eq!(
            recover_list(text, "suggestions", 3).expect("recover"),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn falls_back_to_lines_when_json_is_missing() {
        let text = "Could you say that again?\n\nI'd love to try the noodles.\n  What do you recommend?  \n";
        let set = recover_suggestions(text).expect("line fallback");
        assert_eq!(set.into_inner(), originals());
    }

    #[test]
    fn falls_back_to_lines_when_json_has_too_few_entries() {
        let text = "{\"suggestions\": [\"only one\"]}\nFirst idea\nSecond idea\nThird idea";
        assert_eq!(
            recover_list(text, "suggestions", 3).expect("fallback"),
            vec!["First idea", "Second idea", "Third idea"]
        );
    }

    #[test]
    fn truncated_single_line_json_fails() {
        let text = r#"{"suggestions": ["one", "two""#;
        let err = recover_suggestions(text).unwrap_err();
        assert!(matches!(err, PortError::Recovery(_)));
    }

    #[test]
    fn too_few_lines_is_a_recovery_failure() {
        let err = recover_suggestions("Just one idea\nand another").unwrap_err();
        assert!(matches!(err, PortError::Recovery(_)));
    }

    #[test]
    fn recovers_json_object_for_other_keys() {
        let map = recover_json_object("```json\n{\"translatedText\": \"你好\", \"sourceLanguage\": \"en\"}\n```")
            .expect("object");
        assert_eq!(map.get("translatedText"), Some(&json!("你好")));
        assert!(recover_json_object("no braces here").is_none());
        assert!(recover_json_object("[1, 2, 3]").is_none());
    }

    #[test]
    fn salvages_a_field_cut_off_mid_string() {
        let cut = "{\"translatedText\": \"你好，你好嗎";
        assert!(recover_json_object(cut).is_none());
        assert_eq!(salvage_string_field(cut, "translatedText").as_deref(), Some("你好，你好嗎"));
    }

    #[test]
    fn salvages_a_closed_field_from_a_broken_object() {
        let broken = "```json\n{\"translatedText\": \"Say \\\"hi\\\"\\nplease\", \"sourceLanguage\": \"en\n```";
        assert_eq!(
            salvage_string_field(broken, "translatedText").as_deref(),
            Some("Say \"hi\"\nplease")
        );
    }

    #[test]
    fn salvage_drops_an_unfinished_escape() {
        assert_eq!(
            salvage_string_field("{\"translatedText\": \"Hola\\", "translatedText").as_deref(),
            Some("Hola")
        );
    }

    #[test]
    fn salvage_needs_a_non_empty_value_for_the_key() {
        assert!(salvage_string_field("{\"foo\": ", "translatedText").is_none());
        assert!(salvage_string_field("{\"translatedText\": \"  ", "translatedText").is_none());
        assert!(salvage_string_field("{\"translatedText\": 42", "translatedText").is_none());
    }

    #[test]
    fn strip_code_fence_leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}"), "{\"a\": 1}");
    }
}
