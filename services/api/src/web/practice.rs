//! services/api/src/web/practice.rs
//!
//! Handlers for storing and reading practice records, plus the helper the AI
//! routes use to record a result when the caller names a user.

use crate::error::ApiError;
use crate::web::{envelope::Envelope, state::AppState};
use axum::extract::{rejection::JsonRejection, rejection::PathRejection, Path, State};
use axum::Json;
use lingo_core::domain::{NewPracticeRecord, PracticeKind, PracticeRecord};
use lingo_core::validation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePracticeRequest {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

//=========================================================================================
// Recording Helper
//=========================================================================================

/// Stores `result` as a practice record for `user_id`, if one was given.
///
/// The response has already been computed by the time this runs, so a storage
/// failure is logged rather than returned.
pub async fn remember<T: Serialize>(
    state: &AppState,
    user_id: Option<Uuid>,
    kind: PracticeKind,
    input_text: &str,
    result: &T,
) {
    let Some(user_id) = user_id else {
        return;
    };
    let result = match serde_json::to_value(result) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not serialize {} result for storage: {}", kind.as_str(), e);
            return;
        }
    };
    let record = NewPracticeRecord {
        user_id,
        kind,
        input_text: input_text.to_string(),
        result,
    };
    if let Err(e) = state.db.save_practice_record(record).await {
        warn!("Failed to store {} practice record for {}: {}", kind.as_str(), user_id, e);
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/practice - Store a practice record
#[utoipa::path(
    post,
    path = "/api/practice",
    request_body = CreatePracticeRequest,
    responses(
        (status = 201, description = "Practice record stored"),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_practice_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePracticeRequest>, JsonRejection>,
) -> Result<Envelope<PracticeRecord>, ApiError> {
    let Json(req) = payload?;
    let record = validation::practice_record(req.user_id, &req.kind, &req.input_text, req.result)?;
    let stored = state.db.save_practice_record(record).await?;
    info!("Stored practice record {} for user {}", stored.id, stored.user_id);
    Ok(Envelope::created(stored).with_message("Practice record saved"))
}

/// GET /api/practice/{id} - Fetch one practice record
#[utoipa::path(
    get,
    path = "/api/practice/{id}",
    params(("id" = Uuid, Path, description = "Practice record id")),
    responses(
        (status = 200, description = "The practice record"),
        (status = 404, description = "No such record")
    )
)]
pub async fn get_practice_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Envelope<PracticeRecord>, ApiError> {
    let Path(id) = id?;
    let record = state.db.get_practice_record(id).await?;
    Ok(Envelope::ok(record))
}

/// GET /api/users/{user_id}/practice - List a user's practice records, newest first
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/practice",
    params(("user_id" = Uuid, Path, description = "Opaque user id")),
    responses(
        (status = 200, description = "The user's practice records")
    )
)]
pub async fn list_practice_handler(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Envelope<Vec<PracticeRecord>>, ApiError> {
    let Path(user_id) = user_id?;
    let records = state.db.list_practice_records_for_user(user_id).await?;
    Ok(Envelope::ok(records))
}
