//! services/api/src/web/gpt.rs
//!
//! Handlers for the text-generation routes. Every handler validates its input
//! before touching the provider, then wraps the typed result in an envelope.

use crate::coach;
use crate::error::ApiError;
use crate::web::{envelope::Envelope, practice::remember, state::AppState};
use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use lingo_core::domain::{
    Analysis, ChatMessage, ExerciseSet, GenerationOptions, GenerationRequest, GenerationResult,
    PracticeKind, SuggestionSet, Translation,
};
use lingo_core::validation;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// Caller-tunable generation options. Without `model` the server's configured
/// model for the endpoint is used.
#[derive(Deserialize, ToSchema, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OptionsPayload {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub store: Option<bool>,
    pub include: Option<Vec<String>>,
}

impl OptionsPayload {
    fn into_options(self, default_model: &str) -> Result<GenerationOptions, ApiError> {
        let model = match self.model {
            Some(requested) => requested.trim().to_string(),
            None => default_model.to_string(),
        };
        let options = GenerationOptions {
            model,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            top_p: self.top_p,
            store: self.store,
            include: self.include.map(|tokens| tokens.into_iter().collect::<BTreeSet<_>>()),
        };
        Ok(validation::generation_options(options)?)
    }
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct ChatMessagePayload {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessagePayload>,
    #[serde(default)]
    pub options: OptionsPayload,
    pub user_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
    pub instructions: Option<String>,
    #[serde(default)]
    pub options: OptionsPayload,
    pub user_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt_id: String,
    pub prompt_version: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub options: OptionsPayload,
    pub user_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    pub target_language: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub text: String,
    pub level: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    pub level: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRequest {
    #[serde(default)]
    pub topic: String,
    pub difficulty: Option<String>,
    pub count: Option<i64>,
    pub user_id: Option<Uuid>,
}

//=========================================================================================
// Free-form Generation Handlers
//=========================================================================================

async fn run_generation(
    state: &AppState,
    request: GenerationRequest,
    options: GenerationOptions,
    user_id: Option<Uuid>,
    input_text: &str,
) -> Result<Envelope<GenerationResult>, ApiError> {
    let result = state.llm_adapter.generate(&request, &options).await?;
    remember(state, user_id, PracticeKind::Generation, input_text, &result).await;

    let has_content = result.has_content();
    let envelope = Envelope::ok(result);
    Ok(if has_content {
        envelope
    } else {
        envelope.with_message("The model returned no text")
    })
}

/// POST /api/gpt/chat - Chat-completions style generation
#[utoipa::path(
    post,
    path = "/api/gpt/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Generation result"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal or provider error")
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Envelope<GenerationResult>, ApiError> {
    let Json(req) = payload?;
    let messages: Vec<ChatMessage> = req
        .messages
        .into_iter()
        .map(|m| ChatMessage::new(m.role, m.content))
        .collect();
    let request = validation::chat(&messages)?;
    let options = req.options.into_options(&state.config.chat_model)?;

    let input_text = messages
        .iter()
        .rev()
        .find(|m| m.role.trim() == "user")
        .map(|m| m.content.trim().to_string())
        .unwrap_or_default();
    run_generation(&state, request, options, req.user_id, &input_text).await
}

/// POST /api/gpt/generate - Single-input generation through the responses API
#[utoipa::path(
    post,
    path = "/api/gpt/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generation result"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal or provider error")
    )
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Envelope<GenerationResult>, ApiError> {
    let Json(req) = payload?;
    let request = validation::single_input(&req.text, req.instructions.as_deref())?;
    let options = req.options.into_options(&state.config.chat_model)?;
    run_generation(&state, request, options, req.user_id, req.text.trim()).await
}

/// POST /api/gpt/prompt - Generation from a stored, named prompt
#[utoipa::path(
    post,
    path = "/api/gpt/prompt",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Generation result"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal or provider error")
    )
)]
pub async fn prompt_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Envelope<GenerationResult>, ApiError> {
    let Json(req) = payload?;
    let request = validation::named_prompt(&req.prompt_id, req.prompt_version.as_deref(), req.variables)?;
    let options = req.options.into_options(&state.config.chat_model)?;
    let input_text = req.prompt_id.trim().to_string();
    run_generation(&state, request, options, req.user_id, &input_text).await
}

//=========================================================================================
// Practice Feature Handlers
//=========================================================================================

/// POST /api/gpt/translate - Translate text into one of the supported languages
#[utoipa::path(
    post,
    path = "/api/gpt/translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translation"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal or provider error")
    )
)]
pub async fn translate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Envelope<Translation>, ApiError> {
    let Json(req) = payload?;
    let input = validation::translation(&req.text, req.target_language.as_deref())?;

    let translation =
        coach::translate(state.llm_adapter.as_ref(), &state.config.translation_model, &input).await?;
    info!(
        "Translated {} chars from {} to {}",
        input.text.chars().count(),
        translation.source_language,
        translation.target_language
    );
    remember(&state, req.user_id, PracticeKind::Translation, &input.text, &translation).await;
    Ok(Envelope::ok(translation).with_message("Translation completed"))
}

/// POST /api/gpt/suggestions - Three replies the learner could say next
#[utoipa::path(
    post,
    path = "/api/gpt/suggestions",
    request_body = SuggestionRequest,
    responses(
        (status = 200, description = "Exactly three suggestions"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal, provider or recovery error")
    )
)]
pub async fn suggestions_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Envelope<SuggestionSet>, ApiError> {
    let Json(req) = payload?;
    let input = validation::suggestions(&req.text, req.level.as_deref())?;

    let suggestions =
        coach::suggest_replies(state.llm_adapter.as_ref(), &state.config.suggestion_model, &input).await?;
    remember(&state, req.user_id, PracticeKind::Suggestion, &input.text, &suggestions).await;
    Ok(Envelope::ok(suggestions))
}

/// POST /api/gpt/analyze - Tutor feedback on the learner's text
#[utoipa::path(
    post,
    path = "/api/gpt/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Feedback"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal or provider error")
    )
)]
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Envelope<Analysis>, ApiError> {
    let Json(req) = payload?;
    let input = validation::analysis(&req.text, req.level.as_deref())?;

    let analysis =
        coach::analyze_text(state.llm_adapter.as_ref(), &state.config.analysis_model, &input).await?;
    remember(&state, req.user_id, PracticeKind::Analysis, &input.text, &analysis).await;

    let no_feedback = analysis.feedback.is_empty();
    let envelope = Envelope::ok(analysis);
    Ok(if no_feedback {
        envelope.with_message("The model returned no feedback")
    } else {
        envelope
    })
}

/// POST /api/gpt/exercises - Generate practice exercises
#[utoipa::path(
    post,
    path = "/api/gpt/exercises",
    request_body = ExerciseRequest,
    responses(
        (status = 200, description = "Exercises"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal, provider or recovery error")
    )
)]
pub async fn exercises_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExerciseRequest>, JsonRejection>,
) -> Result<Envelope<ExerciseSet>, ApiError> {
    let Json(req) = payload?;
    let input = validation::exercises(&req.topic, req.difficulty.as_deref(), req.count)?;

    let exercises =
        coach::generate_exercises(state.llm_adapter.as_ref(), &state.config.suggestion_model, &input).await?;
    remember(&state, req.user_id, PracticeKind::Exercise, &input.topic, &exercises).await;
    Ok(Envelope::ok(exercises))
}
