use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::phase::VisibleLoadPhase;

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event carrying a raw string payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever a load starts, succeeds, or fails.
pub struct LoadPhaseEvent {
    pub phase: VisibleLoadPhase,
    pub current_week: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after a week's scores were saved and the snapshot patched.
pub struct ScoresUpdatedEvent {
    pub week_number: u32,
    pub current_week: u32,
    /// Number of entries written.
    pub saved: usize,
}
