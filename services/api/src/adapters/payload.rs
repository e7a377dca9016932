//! services/api/src/adapters/payload.rs
//!
//! Builds the JSON bodies sent to OpenAI for each kind of `GenerationRequest`.
//!
//! Options are gated by model family before they get here, and every optional
//! field is skipped when unset, so a dropped parameter is absent from the wire
//! rather than sent as `null`.

use lingo_core::domain::{ChatMessage, GenerationOptions, GenerationRequest};
use lingo_core::model_family::gate_options;
use lingo_core::normalize::ResponseShape;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    pub store: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptReference {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

/// Body for `POST /v1/responses`, either with inline input or a stored prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsesPayload {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    pub store: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundPayload {
    Chat(ChatCompletionPayload),
    Responses(ResponsesPayload),
    NamedPrompt(ResponsesPayload),
}

impl OutboundPayload {
    /// How the provider's answer to this payload must be read.
    pub fn shape(&self) -> ResponseShape {
        match self {
            OutboundPayload::Chat(_) => ResponseShape::ChatCompletion,
            OutboundPayload::Responses(_) => ResponseShape::Responses,
            OutboundPayload::NamedPrompt(_) => ResponseShape::NamedPrompt,
        }
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            OutboundPayload::Chat(body) => serde_json::to_value(body),
            OutboundPayload::Responses(body) | OutboundPayload::NamedPrompt(body) => {
                serde_json::to_value(body)
            }
        }
    }
}

/// Builds the outbound payload, dropping options the model family rejects.
pub fn build_payload(request: &GenerationRequest, options: &GenerationOptions) -> OutboundPayload {
    let store = options.store.unwrap_or_else(|| request.default_store());
    let (options, _dropped) = gate_options(options.clone());

    match request {
        GenerationRequest::Chat { messages } => OutboundPayload::Chat(ChatCompletionPayload {
            model: options.model,
            messages: messages.clone(),
            temperature: options.temperature,
            top_p: options.top_p,
            max_completion_tokens: options.max_output_tokens,
            store,
        }),
        GenerationRequest::SingleInput { text, instructions } => {
            OutboundPayload::Responses(ResponsesPayload {
                model: options.model,
                input: Some(text.clone()),
                instructions: instructions.clone(),
                prompt: None,
                temperature: options.temperature,
                top_p: options.top_p,
                max_output_tokens: options.max_output_tokens,
                store,
                include: options.include,
            })
        }
        GenerationRequest::NamedPrompt {
            prompt_id,
            prompt_version,
            variables,
        } => OutboundPayload::NamedPrompt(ResponsesPayload {
            model: options.model,
            input: None,
            instructions: None,
            prompt: Some(PromptReference {
                id: prompt_id.clone(),
                version: prompt_version.clone(),
                variables: variables.clone(),
            }),
            temperature: options.temperature,
            top_p: options.top_p,
            max_output_tokens: options.max_output_tokens,
            store,
            include: options.include,
        }),
    }
}
