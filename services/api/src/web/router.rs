//! services/api/src/web/router.rs
//!
//! Assembles every route into one `Router`. CORS and the Swagger UI are layered
//! on by the binary, so tests can drive this router directly.

use crate::web::{gpt, health, practice, state::AppState, whisper};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use lingo_core::validation::MAX_AUDIO_BYTES;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Headroom for the multipart framing and text fields around the audio file.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    let gpt_routes = Router::new()
        .route("/chat", post(gpt::chat_handler))
        .route("/generate", post(gpt::generate_handler))
        .route("/prompt", post(gpt::prompt_handler))
        .route("/translate", post(gpt::translate_handler))
        .route("/suggestions", post(gpt::suggestions_handler))
        .route("/analyze", post(gpt::analyze_handler))
        .route("/exercises", post(gpt::exercises_handler));

    let whisper_routes = Router::new()
        .route("/transcribe", post(whisper::transcribe_handler))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES + FORM_OVERHEAD_BYTES));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/gpt", gpt_routes)
        .nest("/api/whisper", whisper_routes)
        .route("/api/practice", post(practice::create_practice_handler))
        .route("/api/practice/{id}", get(practice::get_practice_handler))
        .route("/api/users/{user_id}/practice", get(practice::list_practice_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
