//! crates/lingo_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{
    AudioClip, GenerationOptions, GenerationRequest, GenerationResult, NewPracticeRecord,
    PracticeRecord, Transcription, TranscriptionOptions,
};
use crate::validation::ValidationFailure;
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port operation.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The caller's input broke a documented constraint.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),
    /// The AI provider answered with an error.
    #[error("{message}")]
    ExternalService { status: u16, message: String },
    /// The model's reply could not be coerced into the expected structure.
    #[error("Could not recover structured output: {0}")]
    Recovery(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    /// Anything else. The message is for logs only.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Runs one generation call and returns the normalized result.
    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> PortResult<GenerationResult>;
}

#[async_trait]
pub trait SpeechToTextService: Send + Sync {
    /// Transcribes an uploaded clip into text.
    async fn transcribe_audio(
        &self,
        clip: AudioClip,
        options: &TranscriptionOptions,
    ) -> PortResult<Transcription>;
}

/// Storage for practice records. Everything else about users lives elsewhere.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    async fn save_practice_record(&self, record: NewPracticeRecord) -> PortResult<PracticeRecord>;

    async fn get_practice_record(&self, id: Uuid) -> PortResult<PracticeRecord>;

    async fn list_practice_records_for_user(&self, user_id: Uuid) -> PortResult<Vec<PracticeRecord>>;
}
