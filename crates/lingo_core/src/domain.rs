//! crates/lingo_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework; the
//! serde attributes only fix the camelCase JSON shape the envelope exposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

//=========================================================================================
// Generation Requests and Options
//=========================================================================================

/// A single turn of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// What to send to the text-generation provider. Exactly one shape per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GenerationRequest {
    /// A chat-completions conversation.
    Chat { messages: Vec<ChatMessage> },
    /// A single inline input for the responses API, with optional instructions.
    SingleInput {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instructions: Option<String>,
    },
    /// A provider-stored prompt referenced by id, filled in with variables.
    NamedPrompt {
        prompt_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_version: Option<String>,
        #[serde(default)]
        variables: BTreeMap<String, String>,
    },
}

impl GenerationRequest {
    /// A short label used in logs and practice records.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationRequest::Chat { .. } => "chat",
            GenerationRequest::SingleInput { .. } => "singleInput",
            GenerationRequest::NamedPrompt { .. } => "namedPrompt",
        }
    }

    /// The value of `store` to use when the caller did not say.
    pub fn default_store(&self) -> bool {
        matches!(self, GenerationRequest::NamedPrompt { .. })
    }
}

/// Tuning knobs for a single generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<BTreeSet<String>>,
}

impl GenerationOptions {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

//=========================================================================================
// Generation Results
//=========================================================================================

/// Token accounting reported by the provider. Missing fields are always 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub cached_tokens: u32,
    pub reasoning_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Completed,
    Failed,
    InProgress,
}

/// The provider-independent outcome of one generation call.
///
/// `text` is empty, never absent, when the provider returned nothing extractable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub usage: TokenUsage,
    pub status: GenerationStatus,
    pub provider_request_id: String,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Exactly three reply suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionSet {
    suggestions: Vec<String>,
}

impl SuggestionSet {
    pub const SIZE: usize = 3;

    /// Builds a set from already-trimmed candidates. Returns `None` unless there
    /// are exactly three non-empty entries.
    pub fn new(suggestions: Vec<String>) -> Option<Self> {
        let valid = suggestions.len() == Self::SIZE
            && suggestions
                .iter()
                .all(|s| !s.is_empty() && s.trim() == s.as_str());
        valid.then_some(Self { suggestions })
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn into_inner(self) -> Vec<String> {
        self.suggestions
    }
}

//=========================================================================================
// Feature Payloads
//=========================================================================================

/// An uploaded audio clip waiting to be transcribed.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Optional hints passed along with an audio clip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptionOptions {
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    pub text: String,
    pub language: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub level: Level,
    pub feedback: String,
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub topic: String,
    pub difficulty: Difficulty,
    pub exercises: Vec<String>,
}

//=========================================================================================
// Allow-listed Enumerations
//=========================================================================================

/// Languages a translation may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "ja-JP")]
    JaJp,
    #[serde(rename = "ko-KR")]
    KoKr,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "de-DE")]
    DeDe,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 7] = [
        TargetLanguage::ZhTw,
        TargetLanguage::ZhCn,
        TargetLanguage::EnUs,
        TargetLanguage::JaJp,
        TargetLanguage::KoKr,
        TargetLanguage::EsEs,
        TargetLanguage::DeDe,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TargetLanguage::ZhTw => "zh-TW",
            TargetLanguage::ZhCn => "zh-CN",
            TargetLanguage::EnUs => "en-US",
            TargetLanguage::JaJp => "ja-JP",
            TargetLanguage::KoKr => "ko-KR",
            TargetLanguage::EsEs => "es-ES",
            TargetLanguage::DeDe => "de-DE",
        }
    }

    /// The name used when instructing the model.
    pub fn display_name(self) -> &'static str {
        match self {
            TargetLanguage::ZhTw => "Traditional Chinese (Taiwan)",
            TargetLanguage::ZhCn => "Simplified Chinese",
            TargetLanguage::EnUs => "English (US)",
            TargetLanguage::JaJp => "Japanese",
            TargetLanguage::KoKr => "Korean",
            TargetLanguage::EsEs => "Spanish",
            TargetLanguage::DeDe => "German",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

impl Default for TargetLanguage {
    fn default() -> Self {
        TargetLanguage::ZhTw
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The learner's proficiency, used to pitch suggestions and feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Practice Records
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Transcription,
    Translation,
    Suggestion,
    Analysis,
    Exercise,
    Generation,
}

impl PracticeKind {
    pub const ALL: [PracticeKind; 6] = [
        PracticeKind::Transcription,
        PracticeKind::Translation,
        PracticeKind::Suggestion,
        PracticeKind::Analysis,
        PracticeKind::Exercise,
        PracticeKind::Generation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PracticeKind::Transcription => "transcription",
            PracticeKind::Translation => "translation",
            PracticeKind::Suggestion => "suggestion",
            PracticeKind::Analysis => "analysis",
            PracticeKind::Exercise => "exercise",
            PracticeKind::Generation => "generation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// A stored practice attempt. `result` is kept as an opaque JSON blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: PracticeKind,
    pub input_text: String,
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// The fields a caller provides when storing a practice record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPracticeRecord {
    pub user_id: Uuid,
    pub kind: PracticeKind,
    pub input_text: String,
    pub result: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generation_request_uses_kind_tag_and_camel_case_fields() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "kind": "namedPrompt",
            "promptId": "pmpt_123",
            "promptVersion": "2",
            "variables": {"topic": "travel"}
        }))
        .expect("deserialize named prompt");

        match &request {
            GenerationRequest::NamedPrompt {
                prompt_id,
                prompt_version,
                variables,
            } => {
                assert_eq!(prompt_id, "pmpt_123");
                assert_eq!(prompt_version.as_deref(), Some("2"));
                assert_eq!(variables.get("topic").map(String::as_str), Some("travel"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
        assert!(request.default_store());
        assert_eq!(request.kind(), "namedPrompt");
    }

    #[test]
    fn suggestion_set_requires_exactly_three_trimmed_entries() {
        let ok = SuggestionSet::new(vec!["a".into(), "b".into(), "c".into()]);
        assert!(ok.is_some());

        assert!(SuggestionSet::new(vec!["a".into(), "b".into()]).is_none());
        assert!(SuggestionSet::new(vec!["a".into(), "".into(), "c".into()]).is_none());
        assert!(SuggestionSet::new(vec!["a".into(), " b".into(), "c".into()]).is_none());
    }

    #[test]
    fn target_language_round_trips_through_its_code() {
        for lang in TargetLanguage::ALL {
            assert_eq!(TargetLanguage::from_code(lang.code()), Some(lang));
        }
        assert_eq!(TargetLanguage::from_code("fr-FR"), None);
        assert_eq!(TargetLanguage::default().code(), "zh-TW");
    }

    #[test]
    fn generation_status_serializes_in_snake_case() {
        let value = serde_json::to_value(GenerationStatus::InProgress).expect("serialize");
        assert_eq!(value, json!("in_progress"));
    }
}
