//! crates/lingo_core/src/validation.rs
//!
//! Per-endpoint request validators. Each validator is a pure function of its
//! input that either returns a typed, already-checked value or the first
//! `ValidationFailure` it encounters. Rules are checked in declaration order, so
//! a given input always fails on the same rule.

use crate::domain::{
    AudioClip, ChatMessage, Difficulty, GenerationOptions, GenerationRequest, Level,
    NewPracticeRecord, PracticeKind, TargetLanguage, TranscriptionOptions,
};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

//=========================================================================================
// Limits
//=========================================================================================

pub const TRANSLATION_TEXT_MAX: usize = 5000;
pub const ANALYSIS_TEXT_MAX: usize = 2000;
pub const SUGGESTION_TEXT_MAX: usize = 1000;
pub const GENERATION_TEXT_MAX: usize = 5000;
pub const INSTRUCTIONS_MAX: usize = 2000;
pub const TOPIC_MAX: usize = 200;
pub const TRANSCRIPTION_PROMPT_MAX: usize = 1000;
pub const PRACTICE_INPUT_MAX: usize = 5000;
pub const MAX_CHAT_MESSAGES: usize = 50;

pub const EXERCISE_COUNT_MIN: u32 = 1;
pub const EXERCISE_COUNT_MAX: u32 = 20;
pub const DEFAULT_EXERCISE_COUNT: u32 = 5;

pub const MAX_OUTPUT_TOKENS_LIMIT: u32 = 16_384;

pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;
pub const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "mp4", "mpeg", "mpga", "m4a", "wav", "webm"];
const AUDIO_MIME_SUBTYPES: [&str; 10] = [
    "mpeg", "mp3", "mp4", "mpga", "m4a", "x-m4a", "wav", "x-wav", "wave", "webm",
];

const CHAT_ROLES: [&str; 4] = ["system", "user", "assistant", "developer"];

//=========================================================================================
// The Failure Type
//=========================================================================================

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Required,
    MaxLength,
    OneOf,
    Range,
    MaxSize,
    FileType,
}

/// A caller-input rejection, always surfaced as a 400-class error.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("{message}")]
pub struct ValidationFailure {
    pub field: String,
    pub constraint: Constraint,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint,
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, Constraint::Required, format!("{} is required", field))
    }
}

pub type Validated<T> = Result<T, ValidationFailure>;

//=========================================================================================
// Field-level Rules
//=========================================================================================

/// Non-empty after trimming and at most `max` characters. Returns the trimmed text.
pub fn text_field(field: &str, value: &str, max: usize) -> Validated<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::required(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationFailure::new(
            field,
            Constraint::MaxLength,
            format!("{} must be at most {} characters", field, max),
        ));
    }
    Ok(trimmed.to_string())
}

fn optional_text_field(field: &str, value: Option<&str>, max: usize) -> Validated<Option<String>> {
    match value {
        Some(v) if !v.trim().is_empty() => text_field(field, v, max).map(Some),
        _ => Ok(None),
    }
}

/// Looks `value` up in an allow-list; the failure message enumerates the list.
pub fn one_of<T: Copy>(
    field: &str,
    value: &str,
    allowed: &[T],
    name: impl Fn(T) -> &'static str,
) -> Validated<T> {
    allowed
        .iter()
        .copied()
        .find(|candidate| name(*candidate) == value)
        .ok_or_else(|| {
            let names: Vec<&str> = allowed.iter().map(|a| name(*a)).collect();
            ValidationFailure::new(
                field,
                Constraint::OneOf,
                format!(
                    "{} '{}' is not supported. Supported values: {}",
                    field,
                    value,
                    names.join(", ")
                ),
            )
        })
}

pub fn int_in_range(field: &str, value: i64, min: u32, max: u32) -> Validated<u32> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ValidationFailure::new(
            field,
            Constraint::Range,
            format!("{} must be between {} and {}", field, min, max),
        ));
    }
    Ok(value as u32)
}

fn float_in_range(field: &str, value: f32, min: f32, max: f32) -> Validated<f32> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationFailure::new(
            field,
            Constraint::Range,
            format!("{} must be between {} and {}", field, min, max),
        ));
    }
    Ok(value)
}

pub fn target_language(value: Option<&str>) -> Validated<TargetLanguage> {
    match value {
        None => Ok(TargetLanguage::default()),
        Some(code) => one_of("targetLanguage", code.trim(), &TargetLanguage::ALL, TargetLanguage::code),
    }
}

pub fn difficulty(value: Option<&str>) -> Validated<Difficulty> {
    match value {
        None => Ok(Difficulty::Medium),
        Some(v) => one_of("difficulty", v.trim(), &Difficulty::ALL, Difficulty::as_str),
    }
}

pub fn level(value: Option<&str>) -> Validated<Level> {
    match value {
        None => Ok(Level::Intermediate),
        Some(v) => one_of("level", v.trim(), &Level::ALL, Level::as_str),
    }
}

/// Checks the caller-tunable parts of `GenerationOptions`.
pub fn generation_options(options: GenerationOptions) -> Validated<GenerationOptions> {
    if options.model.trim().is_empty() {
        return Err(ValidationFailure::new(
            "model",
            Constraint::Required,
            "model must be a non-empty string",
        ));
    }
    if let Some(t) = options.temperature {
        float_in_range("temperature", t, 0.0, 2.0)?;
    }
    if let Some(p) = options.top_p {
        float_in_range("topP", p, 0.0, 1.0)?;
    }
    if let Some(max) = options.max_output_tokens {
        int_in_range("maxOutputTokens", i64::from(max), 1, MAX_OUTPUT_TOKENS_LIMIT)?;
    }
    if let Some(include) = &options.include {
        if include.iter().any(|token| token.trim().is_empty()) {
            return Err(ValidationFailure::new(
                "include",
                Constraint::Required,
                "include entries must be non-empty",
            ));
        }
    }
    Ok(options)
}

//=========================================================================================
// Endpoint Validators
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationInput {
    pub text: String,
    pub target_language: TargetLanguage,
}

pub fn translation(text: &str, target: Option<&str>) -> Validated<TranslationInput> {
    Ok(TranslationInput {
        text: text_field("text", text, TRANSLATION_TEXT_MAX)?,
        target_language: target_language(target)?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionInput {
    pub text: String,
    pub level: Level,
}

pub fn suggestions(text: &str, level_value: Option<&str>) -> Validated<SuggestionInput> {
    Ok(SuggestionInput {
        text: text_field("text", text, SUGGESTION_TEXT_MAX)?,
        level: level(level_value)?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub text: String,
    pub level: Level,
}

pub fn analysis(text: &str, level_value: Option<&str>) -> Validated<AnalysisInput> {
    Ok(AnalysisInput {
        text: text_field("text", text, ANALYSIS_TEXT_MAX)?,
        level: level(level_value)?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseInput {
    pub topic: String,
    pub difficulty: Difficulty,
    pub count: u32,
}

pub fn exercises(topic: &str, difficulty_value: Option<&str>, count: Option<i64>) -> Validated<ExerciseInput> {
    Ok(ExerciseInput {
        topic: text_field("topic", topic, TOPIC_MAX)?,
        difficulty: difficulty(difficulty_value)?,
        count: int_in_range(
            "count",
            count.unwrap_or(i64::from(DEFAULT_EXERCISE_COUNT)),
            EXERCISE_COUNT_MIN,
            EXERCISE_COUNT_MAX,
        )?,
    })
}

pub fn chat(messages: &[ChatMessage]) -> Validated<GenerationRequest> {
    if messages.is_empty() {
        return Err(ValidationFailure::new(
            "messages",
            Constraint::Required,
            "messages must contain at least one message",
        ));
    }
    if messages.len() > MAX_CHAT_MESSAGES {
        return Err(ValidationFailure::new(
            "messages",
            Constraint::MaxLength,
            format!("messages must contain at most {} entries", MAX_CHAT_MESSAGES),
        ));
    }

    let mut checked = Vec::with_capacity(messages.len());
    for (index, message) in messages.iter().enumerate() {
        let role = message.role.trim();
        if role.is_empty() || message.content.trim().is_empty() {
            return Err(ValidationFailure::new(
                format!("messages[{}]", index),
                Constraint::Required,
                format!("messages[{}] must have a non-empty role and content", index),
            ));
        }
        let role = one_of(&format!("messages[{}].role", index), role, &CHAT_ROLES, |r| r)?;
        let content = text_field(&format!("messages[{}].content", index), &message.content, GENERATION_TEXT_MAX)?;
        checked.push(ChatMessage::new(role, content));
    }
    Ok(GenerationRequest::Chat { messages: checked })
}

pub fn single_input(text: &str, instructions: Option<&str>) -> Validated<GenerationRequest> {
    Ok(GenerationRequest::SingleInput {
        text: text_field("text", text, GENERATION_TEXT_MAX)?,
        instructions: optional_text_field("instructions", instructions, INSTRUCTIONS_MAX)?,
    })
}

pub fn named_prompt(
    prompt_id: &str,
    prompt_version: Option<&str>,
    variables: BTreeMap<String, String>,
) -> Validated<GenerationRequest> {
    let prompt_id = prompt_id.trim();
    if prompt_id.is_empty() {
        return Err(ValidationFailure::required("promptId"));
    }
    let prompt_version = match prompt_version {
        Some(v) if v.trim().is_empty() => return Err(ValidationFailure::required("promptVersion")),
        Some(v) => Some(v.trim().to_string()),
        None => None,
    };
    if variables.keys().any(|k| k.trim().is_empty()) {
        return Err(ValidationFailure::new(
            "variables",
            Constraint::Required,
            "variable names must be non-empty",
        ));
    }
    Ok(GenerationRequest::NamedPrompt {
        prompt_id: prompt_id.to_string(),
        prompt_version,
        variables,
    })
}

//=========================================================================================
// Audio Uploads
//=========================================================================================

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn mime_allowed(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() || essence == "application/octet-stream" {
        return true;
    }
    match essence.split_once('/') {
        Some(("audio" | "video", subtype)) => AUDIO_MIME_SUBTYPES.contains(&subtype),
        _ => false,
    }
}

/// Checks an uploaded clip before it is forwarded to Whisper.
pub fn audio_clip(clip: &AudioClip) -> Validated<()> {
    if clip.data.is_empty() {
        return Err(ValidationFailure::required("file"));
    }
    if clip.data.len() > MAX_AUDIO_BYTES {
        return Err(ValidationFailure::new(
            "file",
            Constraint::MaxSize,
            format!("file must be at most {} MB", MAX_AUDIO_BYTES / (1024 * 1024)),
        ));
    }
    let supported = || format!("Supported formats: {}", AUDIO_EXTENSIONS.join(", "));
    match extension_of(&clip.file_name) {
        Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(ValidationFailure::new(
                "file",
                Constraint::FileType,
                format!("Unsupported audio file '{}'. {}", clip.file_name, supported()),
            ))
        }
    }
    if let Some(content_type) = &clip.content_type {
        if !mime_allowed(content_type) {
            return Err(ValidationFailure::new(
                "file",
                Constraint::FileType,
                format!("Unsupported audio content type '{}'. {}", content_type, supported()),
            ));
        }
    }
    Ok(())
}

pub fn transcription_options(
    language: Option<&str>,
    prompt: Option<&str>,
    temperature: Option<f32>,
) -> Validated<TranscriptionOptions> {
    let language = match language.map(str::trim) {
        Some(code) if !code.is_empty() => {
            let well_formed = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
            if !well_formed {
                return Err(ValidationFailure::new(
                    "language",
                    Constraint::OneOf,
                    "language must be an ISO-639-1 code such as 'en' or 'zh'",
                ));
            }
            Some(code.to_ascii_lowercase())
        }
        _ => None,
    };
    let temperature = temperature
        .map(|t| float_in_range("temperature", t, 0.0, 1.0))
        .transpose()?;
    Ok(TranscriptionOptions {
        language,
        prompt: optional_text_field("prompt", prompt, TRANSCRIPTION_PROMPT_MAX)?,
        temperature,
    })
}

//=========================================================================================
// Practice Records
//=========================================================================================

pub fn practice_record(
    user_id: Option<Uuid>,
    kind: &str,
    input_text: &str,
    result: serde_json::Value,
) -> Validated<NewPracticeRecord> {
    let user_id = user_id.ok_or_else(|| ValidationFailure::required("userId"))?;
    let kind = one_of("kind", kind.trim(), &PracticeKind::ALL, PracticeKind::as_str)?;
    let input_text = text_field("inputText", input_text, PRACTICE_INPUT_MAX)?;
    if result.is_null() {
        return Err(ValidationFailure::required("result"));
    }
    Ok(NewPracticeRecord {
        user_id,
        kind,
        input_text,
        result,
    })
}
