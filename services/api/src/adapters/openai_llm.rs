//! services/api/src/adapters/openai_llm.rs
//!
//! This module contains the adapter for OpenAI text generation.
//! It implements the `TextGenerationService` port from the `core` crate for all
//! three request kinds: chat completions, inline responses, and stored prompts.

use crate::adapters::payload::{build_payload, OutboundPayload};
use crate::adapters::provider_error::{map_openai_error, PROVIDER_NAME};
use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use lingo_core::domain::{GenerationOptions, GenerationRequest, GenerationResult};
use lingo_core::fault::{map_provider_fault, ProviderFault};
use lingo_core::normalize::{normalize, ProviderResponse};
use lingo_core::ports::{PortResult, TextGenerationService};
use std::time::Instant;
use tracing::{debug, info};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using the OpenAI API.
#[derive(Clone)]
pub struct OpenAiTextAdapter {
    client: Client<OpenAIConfig>,
}

impl OpenAiTextAdapter {
    /// Creates a new `OpenAiTextAdapter`.
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }

    /// Sends the payload to the matching endpoint and returns the raw JSON body.
    async fn send(&self, payload: &OutboundPayload) -> PortResult<serde_json::Value> {
        let body = payload.to_value().map_err(|e| {
            map_provider_fault(
                PROVIDER_NAME,
                ProviderFault::Other(format!("Could not encode generation request: {}", e)),
            )
        })?;
        let result: Result<serde_json::Value, OpenAIError> = match payload {
            OutboundPayload::Chat(_) => self.client.chat().create_byot(body).await,
            OutboundPayload::Responses(_) | OutboundPayload::NamedPrompt(_) => {
                self.client.responses().create_byot(body).await
            }
        };
        result.map_err(map_openai_error)
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiTextAdapter {
    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> PortResult<GenerationResult> {
        let payload = build_payload(request, options);
        debug!(kind = request.kind(), model = %options.model, "Sending generation request");

        let started = Instant::now();
        let raw = self.send(&payload).await?;

        let response = ProviderResponse::from_value(payload.shape(), raw).map_err(|e| {
            map_provider_fault(
                PROVIDER_NAME,
                ProviderFault::Other(format!("Unreadable generation response: {}", e)),
            )
        })?;
        let result = normalize(response, &options.model);

        info!(
            kind = request.kind(),
            model = %result.model_id,
            total_tokens = result.usage.total_tokens,
            "⏱️ Generation took: {:?}",
            started.elapsed()
        );
        Ok(result)
    }
}
