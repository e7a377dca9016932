pub mod domain;
pub mod fault;
pub mod model_family;
pub mod normalize;
pub mod ports;
pub mod recovery;
pub mod validation;

pub use domain::{
    Analysis, AudioClip, ChatMessage, Difficulty, ExerciseSet, GenerationOptions,
    GenerationRequest, GenerationResult, GenerationStatus, Level, NewPracticeRecord,
    PracticeKind, PracticeRecord, SuggestionSet, TargetLanguage, TokenUsage, Transcription,
    TranscriptionOptions, Translation,
};
pub use fault::{map_provider_fault, ApiFault, ProviderFault};
pub use normalize::{normalize, ProviderResponse, ResponseShape};
pub use ports::{
    DatabaseService, PortError, PortResult, SpeechToTextService, TextGenerationService,
};
pub use validation::{Constraint, ValidationFailure};
