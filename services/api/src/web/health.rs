//! services/api/src/web/health.rs

use crate::web::envelope::Envelope;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

/// GET /health - Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "The service is up", body = HealthStatus))
)]
pub async fn health_handler() -> Envelope<HealthStatus> {
    Envelope::ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
