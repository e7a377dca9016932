//! crates/lingo_core/src/normalize.rs
//!
//! Turns the raw body of a provider call into a `GenerationResult`.
//!
//! The provider answers in one of three shapes depending on which API the
//! request went through. Each shape is deserialized leniently (every field is
//! optional) into its own struct, and `ProviderResponse` closes over them so the
//! normalizer can match exhaustively.

use crate::domain::{GenerationResult, GenerationStatus, TokenUsage};
use chrono::{DateTime, Utc};
use serde::Deserialize;

//=========================================================================================
// Raw Shapes
//=========================================================================================

/// Shape A: a chat-completions body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatCompletionBody {
    pub id: Option<String>,
    pub model: Option<String>,
    pub created: Option<i64>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub prompt_tokens_details: Option<CachedTokenDetails>,
    pub completion_tokens_details: Option<ReasoningTokenDetails>,
}

/// Shapes B and C: a responses-API body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponsesBody {
    pub id: Option<String>,
    pub model: Option<String>,
    pub created_at: Option<i64>,
    pub status: Option<String>,
    pub output: Vec<OutputItem>,
    pub usage: Option<ResponsesUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponsesUsage {
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub input_tokens_details: Option<CachedTokenDetails>,
    pub output_tokens_details: Option<ReasoningTokenDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CachedTokenDetails {
    pub cached_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReasoningTokenDetails {
    pub reasoning_tokens: Option<u32>,
}

/// Which API a request went through, and therefore how its body must be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    ChatCompletion,
    Responses,
    NamedPrompt,
}

/// A raw provider body tagged with the API that produced it.
#[derive(Debug, Clone)]
pub enum ProviderResponse {
    ChatCompletion(ChatCompletionBody),
    Responses(ResponsesBody),
    NamedPrompt(ResponsesBody),
}

impl ProviderResponse {
    /// Reads a JSON body as the given shape. Unknown fields are ignored and
    /// missing ones default, so this only fails when the body is not an object
    /// or a field has the wrong JSON type.
    pub fn from_value(shape: ResponseShape, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match shape {
            ResponseShape::ChatCompletion => ProviderResponse::ChatCompletion(serde_json::from_value(value)?),
            ResponseShape::Responses => ProviderResponse::Responses(serde_json::from_value(value)?),
            ResponseShape::NamedPrompt => ProviderResponse::NamedPrompt(serde_json::from_value(value)?),
        })
    }
}

//=========================================================================================
// Normalization
//=========================================================================================

/// Produces a `GenerationResult` from any provider shape. Never fails: absent
/// text becomes `""` and absent counters become 0.
pub fn normalize(response: ProviderResponse, fallback_model: &str) -> GenerationResult {
    match response {
        ProviderResponse::ChatCompletion(body) => normalize_chat(body, fallback_model),
        ProviderResponse::Responses(body) | ProviderResponse::NamedPrompt(body) => {
            normalize_responses(body, fallback_model)
        }
    }
}

fn normalize_chat(body: ChatCompletionBody, fallback_model: &str) -> GenerationResult {
    let text = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default();

    let usage = body
        .usage
        .map(|u| {
            usage_from_parts(
                u.prompt_tokens,
                u.completion_tokens,
                u.total_tokens,
                u.prompt_tokens_details.and_then(|d| d.cached_tokens),
                u.completion_tokens_details.and_then(|d| d.reasoning_tokens),
            )
        })
        .unwrap_or_default();

    GenerationResult {
        text,
        model_id: body.model.unwrap_or_else(|| fallback_model.to_string()),
        usage,
        status: GenerationStatus::Completed,
        provider_request_id: body.id.unwrap_or_default(),
        created_at: timestamp_or_now(body.created),
    }
}

fn normalize_responses(body: ResponsesBody, fallback_model: &str) -> GenerationResult {
    let text = first_output_text(&body.output).unwrap_or_default();

    let usage = body
        .usage
        .map(|u| {
            usage_from_parts(
                u.input_tokens,
                u.output_tokens,
                u.total_tokens,
                u.input_tokens_details.and_then(|d| d.cached_tokens),
                u.output_tokens_details.and_then(|d| d.reasoning_tokens),
            )
        })
        .unwrap_or_default();

    GenerationResult {
        text,
        model_id: body.model.unwrap_or_else(|| fallback_model.to_string()),
        usage,
        status: status_from(body.status.as_deref()),
        provider_request_id: body.id.unwrap_or_default(),
        created_at: timestamp_or_now(body.created_at),
    }
}

/// The text of the first `output_text` part of the first `message` item. Later
/// candidates are ignored even when present.
fn first_output_text(output: &[OutputItem]) -> Option<String> {
    let message = output
        .iter()
        .find(|item| item.kind.as_deref() == Some("message"))?;
    message
        .content
        .iter()
        .find(|part| part.kind.as_deref() == Some("output_text"))
        .map(|part| part.text.clone().unwrap_or_default())
}

fn usage_from_parts(
    prompt: Option<u32>,
    completion: Option<u32>,
    total: Option<u32>,
    cached: Option<u32>,
    reasoning: Option<u32>,
) -> TokenUsage {
    let prompt_tokens = prompt.unwrap_or(0);
    let completion_tokens = completion.unwrap_or(0);
    TokenUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens: total.unwrap_or_else(|| prompt_tokens.saturating_add(completion_tokens)),
        cached_tokens: cached.unwrap_or(0),
        reasoning_tokens: reasoning.unwrap_or(0),
    }
}

fn status_from(status: Option<&str>) -> GenerationStatus {
    match status {
        None | Some("completed") => GenerationStatus::Completed,
        Some("in_progress") | Some("queued") => GenerationStatus::InProgress,
        Some(_) => GenerationStatus::Failed,
    }
}

fn timestamp_or_now(seconds: Option<i64>) -> DateTime<Utc> {
    seconds
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
        })
    }

    fn responses_body(content: &str) -> serde_json::Value {
        json!({
            "id": "resp_1",
            "object": "response",
            "created_at": 1_700_000_000,
            "status": "completed",
            "model": "gpt-4o-mini",
            "output": [
                {"type": "reasoning", "id": "rs_1", "summary": []},
                {"type": "message", "id": "msg_1", "role": "assistant", "content": [
                    {"type": "output_text", "text": content, "annotations": []},
                    {"type": "output_text", "text": "second candidate", "annotations": []}
                ]}
            ],
            "usage": {
                "input_tokens": 12,
                "output_tokens": 8,
                "total_tokens": 20,
                "input_tokens_details": {"cached_tokens": 4},
                "output_tokens_details": {"reasoning_tokens": 2}
            }
        })
    }

    fn run(shape: ResponseShape, value: serde_json::Value) -> GenerationResult {
        let response = ProviderResponse::from_value(shape, value).expect("parse body");
        normalize(response, "fallback-model")
    }

    #[test]
    fn all_shapes_agree_on_text_and_totals() {
        let a = run(ResponseShape::ChatCompletion, chat_body("Hola"));
        let b = run(ResponseShape::Responses, responses_body("Hola"));
        let c = run(ResponseShape::NamedPrompt, responses_body("Hola"));

        for result in [&a, &b, &c] {
            assert_eq!(result.text, "Hola");
            assert_eq!(result.usage.prompt_tokens, 12);
            assert_eq!(result.usage.completion_tokens, 8);
            assert_eq!(
                result.usage.total_tokens,
                result.usage.prompt_tokens + result.usage.completion_tokens
            );
            assert_eq!(result.status, GenerationStatus::Completed);
        }
        assert_eq!(a.provider_request_id, "chatcmpl-1");
        assert_eq!(b.provider_request_id, "resp_1");
        assert_eq!(b.created_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn responses_usage_exposes_cached_and_reasoning_tokens() {
        let result = run(ResponseShape::Responses, responses_body("x"));
        assert_eq!(result.usage.cached_tokens, 4);
        assert_eq!(result.usage.reasoning_tokens, 2);
    }

    #[test]
    fn first_output_text_wins() {
        let result = run(ResponseShape::Responses, responses_body("first"));
        assert_eq!(result.text, "first");
    }

    #[test]
    fn missing_content_is_empty_text_not_error() {
        let empty_chat = run(ResponseShape::ChatCompletion, json!({"choices": []}));
        assert_eq!(empty_chat.text, "");
        assert_eq!(empty_chat.model_id, "fallback-model");

        let null_content = run(
            ResponseShape::ChatCompletion,
            json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
        );
        assert_eq!(null_content.text, "");

        let no_message = run(
            ResponseShape::Responses,
            json!({"output": [{"type": "function_call", "name": "lookup"}]}),
        );
        assert_eq!(no_message.text, "");

        let refusal_only = run(
            ResponseShape::NamedPrompt,
            json!({"output": [{"type": "message", "content": [{"type": "refusal", "refusal": "no"}]}]}),
        );
        assert_eq!(refusal_only.text, "");
        assert!(!refusal_only.has_content());
    }

    #[test]
    fn missing_usage_defaults_to_zero() {
        let result = run(ResponseShape::Responses, json!({"output": []}));
        assert_eq!(result.usage, TokenUsage::default());

        let partial = run(
            ResponseShape::ChatCompletion,
            json!({"usage": {"prompt_tokens": 3, "completion_tokens": 4}}),
        );
        assert_eq!(partial.usage.total_tokens, 7);
        assert_eq!(partial.usage.cached_tokens, 0);
    }

    #[test]
    fn maps_response_status() {
        let in_progress = run(ResponseShape::Responses, json!({"status": "in_progress"}));
        assert_eq!(in_progress.status, GenerationStatus::InProgress);
        let failed = run(ResponseShape::Responses, json!({"status": "incomplete"}));
        assert_eq!(failed.status, GenerationStatus::Failed);
    }

    #[test]
    fn rejects_bodies_that_are_not_objects() {
        assert!(ProviderResponse::from_value(ResponseShape::Responses, json!("oops")).is_err());
    }
}
