use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the current health payload while logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let sessions = state.session_count();

    match state.require_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "store health check failed");
            }
        }
        Err(_) => warn!("store unavailable (degraded mode)"),
    }

    if state.is_degraded() {
        HealthResponse::degraded(sessions)
    } else {
        HealthResponse::ok(sessions)
    }
}
