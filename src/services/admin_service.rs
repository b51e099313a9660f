use std::collections::HashMap;

use crate::{
    dto::{
        admin::{SaveScoresRequest, SaveScoresResponse, WeekFormResponse, WeekFormRow},
        common::ContestantSummary,
        validation::coerce_points,
    },
    error::ServiceError,
    services::{public_service::week_range, score_service, standings},
    state::{
        SharedState,
        league::{ContestantId, ScoreEntry, WeekNumber},
        snapshot::FIRST_WEEK,
    },
};

/// Build the score entry form for `week_number`.
///
/// Every contestant is listed. Points are only prefilled for picked contestants that already
/// scored above zero that week, so unpicked contestants always start blank.
pub async fn week_form(
    state: &SharedState,
    week_number: WeekNumber,
) -> Result<WeekFormResponse, ServiceError> {
    if week_number < FIRST_WEEK {
        return Err(ServiceError::InvalidInput(format!(
            "week must be at least {FIRST_WEEK}"
        )));
    }

    let snapshot = state.ready_snapshot().await?;
    let config = state.config();

    let mut prefill: HashMap<&ContestantId, i32> = HashMap::new();
    for entry in standings::weekly_breakdown(&snapshot, week_number) {
        for score in entry.contestant_scores {
            if let Some(contestant) = score.contestant.contestant() {
                if score.points > 0 {
                    prefill.insert(&contestant.id, score.points);
                }
            }
        }
    }

    let contestants = snapshot
        .contestants()
        .iter()
        .map(|contestant| WeekFormRow {
            contestant: ContestantSummary::from(contestant),
            points: prefill.get(&contestant.id).copied(),
            editable: !contestant.is_eliminated,
        })
        .collect();

    let current_week = snapshot.current_week();
    Ok(WeekFormResponse {
        week_number,
        current_week,
        week_options: week_range((current_week + 1).max(config.season_weeks)),
        max_weekly_points: config.max_weekly_points,
        contestants,
    })
}

/// Coerce the submitted points and hand them to the score mutator.
///
/// `saved` counts distinct contestants, so a repeated row is reported once.
pub async fn save_scores(
    state: &SharedState,
    request: SaveScoresRequest,
) -> Result<SaveScoresResponse, ServiceError> {
    let max_points = state.config().max_weekly_points;
    let entries = score_service::collapse_by_contestant(
        request
            .scores
            .iter()
            .map(|score| {
                ScoreEntry::new(
                    score.contestant_id.clone(),
                    coerce_points(score.points.as_ref(), max_points),
                )
            })
            .collect(),
    );
    let saved = entries.len();

    let current_week =
        score_service::update_weekly_scores(state, request.week_number, entries).await?;

    Ok(SaveScoresResponse {
        week_number: request.week_number,
        current_week,
        saved,
    })
}
