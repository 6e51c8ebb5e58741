use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of sessions currently held in the registry.
    pub sessions: usize,
}

impl HealthResponse {
    /// Health response indicating the system is operational.
    pub fn ok(sessions: usize) -> Self {
        Self {
            status: "ok".to_string(),
            sessions,
        }
    }

    /// Health response indicating the store is unreachable.
    pub fn degraded(sessions: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            sessions,
        }
    }
}
