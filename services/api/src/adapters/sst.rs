//! services/api/src/adapters/sst.rs
//!
//! This module contains the adapter for OpenAI's Speech-to-Text (Whisper) service.
//! It implements the `SpeechToTextService` port from the `core` crate.

use crate::adapters::provider_error::map_openai_error;
use async_openai::{
    config::OpenAIConfig,
    types::audio::{AudioInput, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use lingo_core::domain::{AudioClip, Transcription, TranscriptionOptions};
use lingo_core::ports::{PortResult, SpeechToTextService};
use std::time::Instant;
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `SpeechToTextService` port using the OpenAI Whisper API.
#[derive(Clone)]
pub struct OpenAiSstAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSstAdapter {
    /// Creates a new `OpenAiSstAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `SpeechToTextService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SpeechToTextService for OpenAiSstAdapter {
    /// Transcribes an uploaded clip using the configured Whisper model. The clip
    /// is forwarded as-is; Whisper detects the container from the file name.
    async fn transcribe_audio(
        &self,
        clip: AudioClip,
        options: &TranscriptionOptions,
    ) -> PortResult<Transcription> {
        let size = clip.data.len();
        let input = AudioInput::from_vec_u8(clip.file_name, clip.data);

        let request = CreateTranscriptionRequest {
            file: input,
            model: self.model.clone(),
            language: options.language.clone(),
            prompt: options.prompt.clone(),
            temperature: options.temperature,
            ..Default::default()
        };

        let started = Instant::now();
        let response = self
            .client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(map_openai_error)?;
        info!("⏱️ STT of {} bytes took: {:?}", size, started.elapsed());

        Ok(Transcription {
            text: response.text.trim().to_string(),
            language: options.language.clone(),
            model: self.model.clone(),
        })
    }
}
