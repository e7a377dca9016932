//! services/api/src/web/docs.rs
//!
//! The master definition for the OpenAPI specification.

use crate::web::{gpt, health, practice, whisper};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_handler,
        whisper::transcribe_handler,
        gpt::chat_handler,
        gpt::generate_handler,
        gpt::prompt_handler,
        gpt::translate_handler,
        gpt::suggestions_handler,
        gpt::analyze_handler,
        gpt::exercises_handler,
        practice::create_practice_handler,
        practice::get_practice_handler,
        practice::list_practice_handler,
    ),
    components(
        schemas(
            health::HealthStatus,
            gpt::OptionsPayload,
            gpt::ChatMessagePayload,
            gpt::ChatRequest,
            gpt::GenerateRequest,
            gpt::PromptRequest,
            gpt::TranslateRequest,
            gpt::SuggestionRequest,
            gpt::AnalyzeRequest,
            gpt::ExerciseRequest,
            practice::CreatePracticeRequest,
        )
    ),
    tags(
        (name = "Language Practice API", description = "Transcription, translation and tutoring endpoints backed by OpenAI.")
    )
)]
pub struct ApiDoc;
