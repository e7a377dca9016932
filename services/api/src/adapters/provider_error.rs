//! services/api/src/adapters/provider_error.rs
//!
//! Classifies `async-openai` errors into `ProviderFault`s so the core mapper can
//! turn them into the error taxonomy.
//!
//! `async-openai` drops the HTTP status of API error responses and keeps only
//! the error body, so the status is recovered from the error's `code`/`type`.

use async_openai::error::OpenAIError;
use lingo_core::fault::{map_provider_fault, ApiFault, ProviderFault};
use lingo_core::ports::PortError;

pub const PROVIDER_NAME: &str = "OpenAI";

/// The HTTP status OpenAI sends with a given error `code` or `type`.
pub fn status_for(code: Option<&str>, error_type: Option<&str>) -> Option<u16> {
    let by_code = match code {
        Some("rate_limit_exceeded" | "insufficient_quota") => Some(429),
        Some("invalid_api_key") => Some(401),
        Some("model_not_found") => Some(404),
        _ => None,
    };
    by_code.or_else(|| status_for_type(error_type))
}

fn status_for_type(error_type: Option<&str>) -> Option<u16> {
    match error_type? {
        "insufficient_quota" | "rate_limit_error" | "requests" | "tokens" => Some(429),
        "authentication_error" => Some(401),
        "permission_error" => Some(403),
        "not_found_error" => Some(404),
        "invalid_request_error" => Some(400),
        "server_error" => Some(500),
        _ => None,
    }
}

/// Sorts an `OpenAIError` into a typed API fault or a generic one.
pub fn classify(err: OpenAIError) -> ProviderFault {
    match err {
        OpenAIError::ApiError(api) => {
            let status = status_for(api.code.as_deref(), api.r#type.as_deref());
            ProviderFault::Api(ApiFault {
                status,
                error_type: api.r#type,
                code: api.code,
                message: api.message,
            })
        }
        OpenAIError::Reqwest(inner) => match inner.status() {
            Some(status) => ProviderFault::Api(ApiFault {
                status: Some(status.as_u16()),
                error_type: Some("http_error".to_string()),
                code: None,
                message: inner.to_string(),
            }),
            None => ProviderFault::Other(inner.to_string()),
        },
        other => ProviderFault::Other(other.to_string()),
    }
}

/// Classifies and maps in one step; this is what adapters call.
pub fn map_openai_error(err: OpenAIError) -> PortError {
    map_provider_fault(PROVIDER_NAME, classify(err))
}
