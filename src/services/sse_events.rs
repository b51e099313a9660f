use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        phase::VisibleLoadPhase,
        sse::{LoadPhaseEvent, ScoresUpdatedEvent, ServerEvent},
    },
    state::{SharedState, league::WeekNumber},
};

const EVENT_LOAD_PHASE: &str = "load_phase";
const EVENT_SCORES_UPDATED: &str = "scores_updated";

/// Broadcast the current load phase along with the published current week.
pub async fn broadcast_load_phase(state: &SharedState) {
    let status = state.status().await;
    let payload = LoadPhaseEvent {
        phase: VisibleLoadPhase::from(&status.phase),
        current_week: status.snapshot.current_week(),
        error: VisibleLoadPhase::error_of(&status.phase),
    };
    send_public_event(state, EVENT_LOAD_PHASE, &payload);
}

/// Broadcast that a week's scores were saved.
pub fn broadcast_scores_updated(
    state: &SharedState,
    week_number: WeekNumber,
    current_week: WeekNumber,
    saved: usize,
) {
    let payload = ScoresUpdatedEvent {
        week_number,
        current_week,
        saved,
    };
    send_public_event(state, EVENT_SCORES_UPDATED, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::league_store::memory::MemoryLeagueStore, state::AppState};

    #[tokio::test]
    async fn load_phase_event_carries_failure_message() {
        let state = AppState::new(Arc::new(MemoryLeagueStore::new()), AppConfig::default());
        let mut receiver = state.public_sse().subscribe();

        state.record_load_failure("Players fetch failed: offline".into()).await;
        broadcast_load_phase(&state).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_LOAD_PHASE));
        let body: serde_json::Value = serde_json::from_str(&event.data).unwrap();
        assert_eq!(body["phase"], "failed");
        assert_eq!(body["current_week"], 1);
        assert_eq!(body["error"], "Players fetch failed: offline");
    }

    #[tokio::test]
    async fn scores_updated_event_shape() {
        let state = AppState::new(Arc::new(MemoryLeagueStore::new()), AppConfig::default());
        let mut receiver = state.public_sse().subscribe();

        broadcast_scores_updated(&state, 4, 4, 2);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_SCORES_UPDATED));
        let body: serde_json::Value = serde_json::from_str(&event.data).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "week_number": 4, "current_week": 4, "saved": 2 })
        );
    }
}
