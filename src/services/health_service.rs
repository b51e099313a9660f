use tracing::warn;

use crate::{
    dto::health::HealthResponse,
    state::{LoadPhase, SharedState},
};

/// Ping the gateway and report `degraded` when it is unreachable or the last load failed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let gateway_ok = match state.store().health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "gateway health check failed");
            false
        }
    };

    let load_failed = matches!(state.load_phase().await, LoadPhase::Failed(_));
    if gateway_ok && !load_failed {
        HealthResponse::ok()
    } else {
        HealthResponse::degraded()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::league_store::memory::MemoryLeagueStore, state::AppState};

    #[tokio::test]
    async fn failed_load_reports_degraded() {
        let state = AppState::new(Arc::new(MemoryLeagueStore::new()), AppConfig::default());
        assert_eq!(health_status(&state).await.status, "ok");

        state.record_load_failure("Players fetch failed: offline".into()).await;

        assert_eq!(health_status(&state).await.status, "degraded");
    }
}
