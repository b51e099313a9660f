use indexmap::IndexMap;
use tracing::{info, warn};

use crate::{
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        league::{ContestantId, ScoreEntry, WeekNumber},
        snapshot::FIRST_WEEK,
    },
};

/// Persist one week's scores, then patch the published snapshot to match.
///
/// The gateway write is a single idempotent upsert keyed by `(week, contestant)`. Entries that
/// repeat a contestant collapse to the last one first, since the gateway refuses a batch that
/// touches the same key twice. When the write fails the snapshot is left untouched. Returns the
/// current week after the patch.
pub async fn update_weekly_scores(
    state: &SharedState,
    week_number: WeekNumber,
    entries: Vec<ScoreEntry>,
) -> Result<WeekNumber, ServiceError> {
    if week_number < FIRST_WEEK {
        return Err(ServiceError::InvalidInput(format!(
            "week number must be at least {FIRST_WEEK}"
        )));
    }

    let _gate = state.try_write_gate()?;

    let entries = collapse_by_contestant(entries);
    let rows = entries
        .iter()
        .map(|entry| entry.to_entity(week_number))
        .collect::<Vec<_>>();
    if let Err(err) = state.store().upsert_weekly_scores(rows).await {
        warn!(week_number, error = %err, "weekly score upsert failed");
        return Err(ServiceError::SaveFailure(err));
    }

    let current_week = state
        .patch_snapshot(|snapshot| snapshot.apply_scores(week_number, &entries))
        .await;
    info!(
        week_number,
        entries = entries.len(),
        current_week,
        "weekly scores saved"
    );

    sse_events::broadcast_scores_updated(state, week_number, current_week, entries.len());
    Ok(current_week)
}

/// Keep one entry per contestant: the last submitted points, at the first submitted position.
pub(crate) fn collapse_by_contestant(entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    let mut by_contestant: IndexMap<ContestantId, i32> = IndexMap::with_capacity(entries.len());
    for entry in entries {
        by_contestant.insert(entry.contestant_id, entry.points);
    }
    by_contestant
        .into_iter()
        .map(|(contestant_id, points)| ScoreEntry {
            contestant_id,
            points,
        })
        .collect()
}
