use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the gateway is unreachable or the last load failed.
    pub status: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// Create a health response indicating the league data cannot be trusted.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
        }
    }
}
