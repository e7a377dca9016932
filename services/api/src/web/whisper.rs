//! services/api/src/web/whisper.rs
//!
//! The audio transcription route. The upload is read fully into memory,
//! checked, and only then forwarded to the speech-to-text adapter.

use crate::error::ApiError;
use crate::web::{envelope::Envelope, practice::remember, state::AppState};
use axum::extract::{multipart::MultipartRejection, Multipart, State};
use lingo_core::domain::{AudioClip, PracticeKind, Transcription};
use lingo_core::validation::{self, Constraint, ValidationFailure};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Everything a transcription form can carry, before validation.
#[derive(Default)]
struct TranscriptionForm {
    clip: Option<AudioClip>,
    language: Option<String>,
    prompt: Option<String>,
    temperature: Option<String>,
    user_id: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<TranscriptionForm, ApiError> {
    let mut form = TranscriptionForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("audio").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                form.clip = Some(AudioClip {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "language" => form.language = Some(field.text().await?),
            "prompt" => form.prompt = Some(field.text().await?),
            "temperature" => form.temperature = Some(field.text().await?),
            "userId" => form.user_id = Some(field.text().await?),
            _ => {}
        }
    }
    Ok(form)
}

fn parse_temperature(raw: Option<&str>) -> Result<Option<f32>, ValidationFailure> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<f32>().map(Some).map_err(|_| {
            ValidationFailure::new("temperature", Constraint::Range, "temperature must be a number")
        }),
    }
}

fn parse_user_id(raw: Option<&str>) -> Result<Option<Uuid>, ValidationFailure> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| ValidationFailure::new("userId", Constraint::Required, "userId must be a UUID")),
    }
}

/// POST /api/whisper/transcribe - Transcribe an uploaded audio file
#[utoipa::path(
    post,
    path = "/api/whisper/transcribe",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: file (required), language, prompt, temperature, userId"
    ),
    responses(
        (status = 200, description = "Transcription"),
        (status = 400, description = "Missing, oversized or unsupported file"),
        (status = 500, description = "Internal or provider error")
    )
)]
pub async fn transcribe_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Envelope<Transcription>, ApiError> {
    let form = read_form(multipart?).await?;

    let clip = form.clip.ok_or_else(|| ValidationFailure::required("file"))?;
    validation::audio_clip(&clip)?;
    let temperature = parse_temperature(form.temperature.as_deref())?;
    let options =
        validation::transcription_options(form.language.as_deref(), form.prompt.as_deref(), temperature)?;
    let user_id = parse_user_id(form.user_id.as_deref())?;

    info!("Transcribing '{}' ({} bytes)", clip.file_name, clip.data.len());
    let file_name = clip.file_name.clone();
    let transcription = state.sst_adapter.transcribe_audio(clip, &options).await?;

    remember(&state, user_id, PracticeKind::Transcription, &file_name, &transcription).await;
    let envelope = Envelope::ok(transcription);
    Ok(envelope.with_message("Transcription completed"))
}
