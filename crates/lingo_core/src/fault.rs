//! crates/lingo_core/src/fault.rs
//!
//! Maps failures raised while talking to the AI provider onto `PortError`.
//! Adapters classify whatever their client library returned into a
//! `ProviderFault`; this module decides the taxonomy and does the logging, once.

use crate::ports::PortError;
use tracing::error;

/// A typed error response from the provider's API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiFault {
    pub status: Option<u16>,
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: String,
}

/// What went wrong during a provider call, before mapping.
#[derive(Debug)]
pub enum ProviderFault {
    /// The provider answered with a structured API error.
    Api(ApiFault),
    /// Anything else: network failure, undecodable body, missing data.
    Other(String),
    /// Already mapped further down; passed through untouched.
    Mapped(PortError),
}

impl From<PortError> for ProviderFault {
    fn from(err: PortError) -> Self {
        ProviderFault::Mapped(err)
    }
}

/// Converts a provider fault into the error taxonomy, logging it once.
pub fn map_provider_fault(provider: &str, fault: ProviderFault) -> PortError {
    match fault {
        ProviderFault::Api(api) => {
            let status = api.status.unwrap_or(500);
            error!(
                provider,
                status,
                error_type = api.error_type.as_deref().unwrap_or("unknown"),
                code = api.code.as_deref().unwrap_or("unknown"),
                message = %api.message,
                "Provider API error"
            );
            PortError::ExternalService {
                status,
                message: format!("{} API error: {}", provider, api.message),
            }
        }
        ProviderFault::Other(detail) => {
            error!(provider, detail = %detail, "Unexpected failure calling provider");
            PortError::Unexpected(detail)
        }
        ProviderFault::Mapped(err) => err,
    }
}
