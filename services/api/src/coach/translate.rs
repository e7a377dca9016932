//! services/api/src/coach/translate.rs
//!
//! Translation: asks the model for a JSON reply carrying the translation and the
//! detected source language. A reply cut off mid-object keeps whatever
//! `translatedText` survived; a reply that is not JSON at all is used as-is,
//! with a script-based guess for the source language.

use crate::coach::prompts::TRANSLATION_INSTRUCTIONS;
use lingo_core::domain::{ChatMessage, GenerationOptions, GenerationRequest, Translation};
use lingo_core::ports::{PortError, PortResult, TextGenerationService};
use lingo_core::recovery::{recover_json_object, salvage_string_field, strip_code_fence};
use lingo_core::validation::TranslationInput;
use tracing::{error, warn};

/// Translates validated input with the given model.
pub async fn translate(
    llm: &dyn TextGenerationService,
    model: &str,
    input: &TranslationInput,
) -> PortResult<Translation> {
    let target = input.target_language;
    let instructions = TRANSLATION_INSTRUCTIONS
        .replace("{target_name}", target.display_name())
        .replace("{target_code}", target.code());

    let request = GenerationRequest::Chat {
        messages: vec![
            ChatMessage::system(instructions),
            ChatMessage::user(input.text.clone()),
        ],
    };
    let options = GenerationOptions::for_model(model)
        .with_temperature(0.3)
        .with_max_output_tokens(4000);

    let result = llm.generate(&request, &options).await?;

    let (translated_text, reported_language) = match recover_json_object(&result.text) {
        Some(object) => (
            object
                .get("translatedText")
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            object
                .get("sourceLanguage")
                .and_then(|v| v.as_str())
                .and_then(normalize_language_code),
        ),
        None => {
            let body = strip_code_fence(&result.text);
            if body.starts_with('{') {
                let Some(text) = salvage_string_field(body, "translatedText") else {
                    error!(model = %result.model_id, "Translation reply was malformed JSON");
                    return Err(PortError::Recovery(
                        "The model returned malformed JSON for the translation".to_string(),
                    ));
                };
                warn!("Translation reply was malformed JSON; salvaged translatedText");
                (text, None)
            } else {
                warn!("Translation reply was not JSON; using the raw text");
                (body.to_string(), None)
            }
        }
    };

    if translated_text.is_empty() {
        error!(model = %result.model_id, "Model returned an empty translation");
        return Err(PortError::Recovery(
            "The model returned no translation".to_string(),
        ));
    }

    Ok(Translation {
        original_text: input.text.clone(),
        translated_text,
        source_language: reported_language.unwrap_or_else(|| detect_language(&input.text).to_string()),
        target_language: target.code().to_string(),
        model: result.model_id,
        usage: result.usage,
    })
}

/// Reduces a language tag such as `en-US` or `EN` to its primary subtag.
fn normalize_language_code(tag: &str) -> Option<String> {
    let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
    let valid = (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_lowercase());
    valid.then_some(primary)
}

/// A rough guess at the language of `text` from the scripts it uses.
pub fn detect_language(text: &str) -> &'static str {
    let (mut han, mut kana, mut hangul) = (0usize, 0usize, 0usize);
    for c in text.chars() {
        match c {
            '\u{3040}'..='\u{30FF}' => kana += 1,
            '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' => hangul += 1,
            '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' => han += 1,
            _ => {}
        }
    }
    if hangul > 0 {
        "ko"
    } else if kana > 0 {
        "ja"
    } else if han > 0 {
        "zh"
    } else if text.contains(['ñ', '¿', '¡']) {
        "es"
    } else if text.contains(['ä', 'ö', 'ü', 'ß']) {
        "de"
    } else {
        "en"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_reported_language_tags() {
        assert_eq!(normalize_language_code("en-US").as_deref(), Some("en"));
        assert_eq!(normalize_language_code(" ZH_tw ").as_deref(), Some("zh"));
        assert_eq!(normalize_language_code("English"), None);
        assert_eq!(normalize_language_code(""), None);
    }

    #[test]
    fn detects_language_from_script() {
        assert_eq!(detect_language("Hello, how are you?"), "en");
        assert_eq!(detect_language("你好嗎"), "zh");
        assert_eq!(detect_language("こんにちは"), "ja");
        assert_eq!(detect_language("안녕하세요"), "ko");
        assert_eq!(detect_language("¿Cómo estás?"), "es");
        assert_eq!(detect_language("Schöne Grüße"), "de");
    }
}
