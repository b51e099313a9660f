use std::collections::HashMap;

use crate::{
    dto::{
        common::{ContestantSummary, MemberSummary},
        public::{
            BreakdownRow, ContestantWeekRow, LeaderboardResponse, LeaderboardRow,
            LeagueStatusResponse, PickScore, RosterEntry, RulesResponse, ScoringRuleResponse,
            TribeCardResponse, TribesResponse, WeekQuery, WeeklyBreakdownResponse,
        },
    },
    error::ServiceError,
    services::standings,
    state::{
        SharedState,
        league::{ContestantId, WeekNumber},
        snapshot::FIRST_WEEK,
    },
};

/// Report the load phase and snapshot metadata. Available in every phase.
pub async fn get_status(state: &SharedState) -> LeagueStatusResponse {
    LeagueStatusResponse::from(&state.status().await)
}

/// Return the season standings with league-wide figures.
pub async fn get_leaderboard(state: &SharedState) -> Result<LeaderboardResponse, ServiceError> {
    let snapshot = state.ready_snapshot().await?;
    let entries = standings::leaderboard(&snapshot);

    let totals: Vec<i64> = entries.iter().map(|entry| entry.total_points).collect();
    let standings = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| LeaderboardRow {
            rank: index + 1,
            member: MemberSummary::from(entry.member),
            total_points: entry.total_points,
        })
        .collect();

    Ok(LeaderboardResponse {
        current_week: snapshot.current_week(),
        standings,
        highest_points: totals.first().copied(),
        average_points: rounded_average(&totals),
    })
}

/// Return per-member points for the requested week, defaulting to the current week.
pub async fn get_weekly_breakdown(
    state: &SharedState,
    query: WeekQuery,
) -> Result<WeeklyBreakdownResponse, ServiceError> {
    let snapshot = state.ready_snapshot().await?;
    let current_week = snapshot.current_week();
    let week_number = query.week.unwrap_or(current_week);
    if week_number < FIRST_WEEK {
        return Err(ServiceError::InvalidInput(format!(
            "week must be at least {FIRST_WEEK}"
        )));
    }

    let mut entries = standings::weekly_breakdown(&snapshot, week_number);
    if query.ranked {
        entries.sort_by(|a, b| b.week_total.cmp(&a.week_total));
    }
    let max_week_total = entries
        .iter()
        .map(|entry| entry.week_total)
        .max()
        .unwrap_or(0)
        .max(0);

    // First pick of each contestant decides the points shown in the contestant table.
    let mut picked_points: HashMap<&ContestantId, i32> = HashMap::new();
    for score in entries.iter().flat_map(|entry| &entry.contestant_scores) {
        if let Some(contestant) = score.contestant.contestant() {
            picked_points.entry(&contestant.id).or_insert(score.points);
        }
    }
    let contestants = snapshot
        .contestants()
        .iter()
        .map(|contestant| ContestantWeekRow {
            contestant: ContestantSummary::from(contestant),
            points: picked_points.get(&contestant.id).copied(),
        })
        .collect();

    let members = entries
        .iter()
        .map(|entry| BreakdownRow {
            member: MemberSummary::from(entry.member),
            week_total: entry.week_total,
            share_of_max: share_of(entry.week_total, max_week_total),
            contestant_scores: entry
                .contestant_scores
                .iter()
                .map(|score| PickScore {
                    contestant_id: score.contestant.id().to_string(),
                    contestant: score.contestant.contestant().map(ContestantSummary::from),
                    points: score.points,
                })
                .collect(),
        })
        .collect();

    Ok(WeeklyBreakdownResponse {
        week_number,
        current_week,
        week_options: week_range(current_week),
        max_week_total,
        members,
        contestants,
    })
}

/// Return every member's roster card with league-wide contestant counts.
pub async fn get_tribes(state: &SharedState) -> Result<TribesResponse, ServiceError> {
    let snapshot = state.ready_snapshot().await?;
    let roster_size = state.config().roster_size;
    let summary = standings::draft_summary(&snapshot);

    let tribes = standings::tribe_roster(&snapshot, roster_size)
        .into_iter()
        .map(|card| TribeCardResponse {
            member: MemberSummary::from(card.member),
            total_points: card.total_points,
            roster: card
                .roster
                .iter()
                .map(|slot| RosterEntry {
                    contestant: ContestantSummary::from(slot.contestant),
                    total_points: slot.total_points,
                })
                .collect(),
            active_count: card.active_count,
            eliminated_count: card.eliminated_count,
            picks_remaining: card.picks_remaining,
        })
        .collect();

    Ok(TribesResponse {
        roster_size,
        active_contestants: summary.active,
        eliminated_contestants: summary.eliminated,
        tribes,
    })
}

/// Return the informational rulebook.
pub fn get_rules(state: &SharedState) -> RulesResponse {
    RulesResponse {
        rules: state
            .config()
            .scoring_rules
            .iter()
            .map(ScoringRuleResponse::from)
            .collect(),
    }
}

/// Weeks `1..=last`.
pub(crate) fn week_range(last: WeekNumber) -> Vec<WeekNumber> {
    (FIRST_WEEK..=last.max(FIRST_WEEK)).collect()
}

/// Mean rounded half up, like a scoreboard would display it.
fn rounded_average(totals: &[i64]) -> Option<i64> {
    let count = i64::try_from(totals.len()).ok().filter(|count| *count > 0)?;
    let sum: i64 = totals.iter().sum();
    Some((2 * sum + count).div_euclid(2 * count))
}

fn share_of(total: i64, max: i64) -> f64 {
    if max > 0 {
        total as f64 / max as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            league_store::memory::{MemoryLeagueStore, SeedData},
            models::{ContestantEntity, PlayerEntity, PlayerPickEntity, WeeklyScoreEntity},
        },
        dto::phase::VisibleLoadPhase,
        services::league_service,
        state::AppState,
    };

    fn player(id: &str, name: &str) -> PlayerEntity {
        PlayerEntity {
            id: id.into(),
            name: name.into(),
            color: "#8b5cf6".into(),
        }
    }

    fn contestant(id: &str, is_eliminated: bool) -> ContestantEntity {
        ContestantEntity {
            id: id.into(),
            name: format!("Contestant {id}"),
            tribe: "Kalo".into(),
            is_eliminated,
        }
    }

    fn score(week_number: u32, contestant_id: &str, points: i32) -> WeeklyScoreEntity {
        WeeklyScoreEntity {
            week_number,
            contestant_id: contestant_id.into(),
            points,
        }
    }

    fn pick(player_id: &str, contestant_id: &str) -> PlayerPickEntity {
        PlayerPickEntity {
            player_id: player_id.into(),
            contestant_id: contestant_id.into(),
        }
    }

    /// A=[c1,c2], B=[c3], week 1 scores c1=5 c2=3 c3=10, one week 2 score c1=4.
    fn seed() -> SeedData {
        SeedData {
            players: vec![player("A", "Alice"), player("B", "Bob")],
            contestants: vec![
                contestant("c1", false),
                contestant("c2", true),
                contestant("c3", false),
                contestant("c4", false),
            ],
            weekly_scores: vec![
                score(1, "c1", 5),
                score(1, "c2", 3),
                score(1, "c3", 10),
                score(2, "c1", 4),
            ],
            player_picks: vec![pick("A", "c1"), pick("A", "c2"), pick("B", "c3")],
        }
    }

    async fn ready_state() -> SharedState {
        let state = AppState::new(
            Arc::new(MemoryLeagueStore::from_seed(seed())),
            AppConfig::default(),
        );
        league_service::refresh(&state).await.unwrap();
        state
    }

    #[tokio::test]
    async fn views_are_unavailable_while_loading() {
        let state = AppState::new(Arc::new(MemoryLeagueStore::new()), AppConfig::default());

        assert!(matches!(
            get_leaderboard(&state).await,
            Err(ServiceError::Loading)
        ));
        assert!(matches!(get_tribes(&state).await, Err(ServiceError::Loading)));
        assert_eq!(get_status(&state).await.phase, VisibleLoadPhase::Loading);
    }

    #[tokio::test]
    async fn leaderboard_ranks_and_averages() {
        let state = ready_state().await;

        let response = get_leaderboard(&state).await.unwrap();

        let rows: Vec<(usize, &str, i64)> = response
            .standings
            .iter()
            .map(|row| (row.rank, row.member.name.as_str(), row.total_points))
            .collect();
        assert_eq!(rows, vec![(1, "Alice", 12), (2, "Bob", 10)]);
        assert_eq!(response.current_week, 2);
        assert_eq!(response.highest_points, Some(12));
        assert_eq!(response.average_points, Some(11));
    }

    #[tokio::test]
    async fn breakdown_defaults_to_current_week() {
        let state = ready_state().await;

        let response = get_weekly_breakdown(&state, WeekQuery::default())
            .await
            .unwrap();

        assert_eq!(response.week_number, 2);
        assert_eq!(response.week_options, vec![1, 2]);
        let totals: Vec<i64> = response.members.iter().map(|row| row.week_total).collect();
        assert_eq!(totals, vec![4, 0]);
        assert_eq!(response.max_week_total, 4);
        assert_eq!(response.members[0].share_of_max, 100.0);
        assert_eq!(response.members[1].share_of_max, 0.0);
    }

    #[tokio::test]
    async fn ranked_breakdown_reorders_a_copy() {
        let state = ready_state().await;

        let ranked = get_weekly_breakdown(
            &state,
            WeekQuery {
                week: Some(1),
                ranked: true,
            },
        )
        .await
        .unwrap();
        let plain = get_weekly_breakdown(
            &state,
            WeekQuery {
                week: Some(1),
                ranked: false,
            },
        )
        .await
        .unwrap();

        let names = |response: &WeeklyBreakdownResponse| -> Vec<String> {
            response
                .members
                .iter()
                .map(|row| row.member.name.clone())
                .collect()
        };
        assert_eq!(names(&ranked), vec!["Bob", "Alice"]);
        assert_eq!(names(&plain), vec!["Alice", "Bob"]);
        assert_eq!(ranked.max_week_total, 10);
    }

    #[tokio::test]
    async fn breakdown_contestant_table_only_credits_picked_contestants() {
        let state = ready_state().await;

        let response = get_weekly_breakdown(
            &state,
            WeekQuery {
                week: Some(1),
                ranked: false,
            },
        )
        .await
        .unwrap();

        let points: Vec<(&str, Option<i32>)> = response
            .contestants
            .iter()
            .map(|row| (row.contestant.id.as_str(), row.points))
            .collect();
        assert_eq!(
            points,
            vec![
                ("c1", Some(5)),
                ("c2", Some(3)),
                ("c3", Some(10)),
                ("c4", None)
            ]
        );
    }

    #[tokio::test]
    async fn tribes_report_roster_and_counts() {
        let state = ready_state().await;

        let response = get_tribes(&state).await.unwrap();

        assert_eq!(response.roster_size, 9);
        assert_eq!(response.active_contestants, 3);
        assert_eq!(response.eliminated_contestants, 1);
        let alice = &response.tribes[0];
        assert_eq!(alice.total_points, 12);
        assert_eq!(alice.active_count, 1);
        assert_eq!(alice.eliminated_count, 1);
        assert_eq!(alice.picks_remaining, 7);
        assert_eq!(alice.roster[0].total_points, 9);
    }

    #[tokio::test]
    async fn rules_come_from_configuration() {
        let state = ready_state().await;

        let response = get_rules(&state);

        assert_eq!(response.rules.len(), 9);
        assert_eq!(response.rules[0].title, "Survival");
    }

    #[test]
    fn average_rounds_half_up() {
        assert_eq!(rounded_average(&[]), None);
        assert_eq!(rounded_average(&[1, 2]), Some(2));
        assert_eq!(rounded_average(&[-1, -2]), Some(-1));
        assert_eq!(rounded_average(&[10, 10, 11]), Some(10));
    }
}
