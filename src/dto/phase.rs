use serde::Serialize;
use utoipa::ToSchema;

use crate::state::LoadPhase;

/// Load phase as exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisibleLoadPhase {
    Loading,
    Ready,
    Failed,
}

impl From<&LoadPhase> for VisibleLoadPhase {
    fn from(phase: &LoadPhase) -> Self {
        match phase {
            LoadPhase::Loading => VisibleLoadPhase::Loading,
            LoadPhase::Ready => VisibleLoadPhase::Ready,
            LoadPhase::Failed(_) => VisibleLoadPhase::Failed,
        }
    }
}

impl VisibleLoadPhase {
    /// Failure message carried by `phase`, if any.
    pub fn error_of(phase: &LoadPhase) -> Option<String> {
        match phase {
            LoadPhase::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }
}
