//! Snapshot loader: fetches the four league relations together and publishes them as one
//! [`Snapshot`].

use tracing::{info, warn};

use crate::{
    dao::{
        league_store::{LeagueStore, Relation},
        models::{ContestantEntity, PlayerEntity, PlayerPickEntity, WeeklyScoreEntity},
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        league::{ContestantId, MemberId, WeekNumber},
        snapshot::Snapshot,
    },
};

/// Read every relation concurrently and build a snapshot once all four reads are back.
///
/// Failures are reported for the first failing relation in the order players, contestants,
/// weekly scores, picks. Rows from the other reads are dropped.
pub async fn load_snapshot(store: &dyn LeagueStore) -> Result<Snapshot, ServiceError> {
    let (players, contestants, weekly_scores, picks) = tokio::join!(
        store.list_players(),
        store.list_contestants(),
        store.list_weekly_scores(),
        store.list_player_picks(),
    );

    let players = players.map_err(|source| ServiceError::FetchFailure {
        relation: Relation::Players,
        source,
    })?;
    let contestants = contestants.map_err(|source| ServiceError::FetchFailure {
        relation: Relation::Contestants,
        source,
    })?;
    let weekly_scores = weekly_scores.map_err(|source| ServiceError::FetchFailure {
        relation: Relation::WeeklyScores,
        source,
    })?;
    let picks = picks.map_err(|source| ServiceError::FetchFailure {
        relation: Relation::PlayerPicks,
        source,
    })?;

    Ok(build_snapshot(players, contestants, weekly_scores, picks))
}

/// Map gateway rows onto the runtime shapes.
pub fn build_snapshot(
    players: Vec<PlayerEntity>,
    contestants: Vec<ContestantEntity>,
    weekly_scores: Vec<WeeklyScoreEntity>,
    picks: Vec<PlayerPickEntity>,
) -> Snapshot {
    Snapshot::new(
        players.into_iter().map(Into::into).collect(),
        contestants.into_iter().map(Into::into).collect(),
        weekly_scores.into_iter().map(Into::into).collect(),
        picks.into_iter().map(|pick| {
            (
                MemberId::new(pick.player_id),
                ContestantId::new(pick.contestant_id),
            )
        }),
    )
}

/// Reload the snapshot from the gateway and publish it, returning the new current week.
///
/// While the load runs, consumers see the loading phase. On failure the previous snapshot stays
/// published and the failure message becomes visible through the load phase.
pub async fn refresh(state: &SharedState) -> Result<WeekNumber, ServiceError> {
    let _gate = state.try_write_gate()?;

    state.begin_loading().await;
    sse_events::broadcast_load_phase(state).await;

    let store = state.store();
    match load_snapshot(store.as_ref()).await {
        Ok(snapshot) => {
            info!(
                members = snapshot.members().len(),
                contestants = snapshot.contestants().len(),
                scores = snapshot.weekly_scores().len(),
                current_week = snapshot.current_week(),
                "league snapshot loaded"
            );
            let current_week = state.publish_snapshot(snapshot).await;
            sse_events::broadcast_load_phase(state).await;
            Ok(current_week)
        }
        Err(err) => {
            warn!(error = %err, "league snapshot load failed");
            state.record_load_failure(err.to_string()).await;
            sse_events::broadcast_load_phase(state).await;
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    };

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            league_store::memory::{MemoryLeagueStore, SeedData},
            storage::{StorageError, StorageResult},
        },
        state::{AppState, LoadPhase},
    };

    fn seed() -> SeedData {
        SeedData {
            players: vec![
                PlayerEntity {
                    id: "p2".into(),
                    name: "Carlos Vega".into(),
                    color: "#10b981".into(),
                },
                PlayerEntity {
                    id: "p1".into(),
                    name: "Maria Vega".into(),
                    color: "#3b82f6".into(),
                },
            ],
            contestants: vec![ContestantEntity {
                id: "c1".into(),
                name: "Sarah Martinez".into(),
                tribe: "Blue".into(),
                is_eliminated: false,
            }],
            weekly_scores: vec![
                WeeklyScoreEntity {
                    week_number: 3,
                    contestant_id: "c1".into(),
                    points: 14,
                },
                WeeklyScoreEntity {
                    week_number: 1,
                    contestant_id: "c1".into(),
                    points: 12,
                },
            ],
            player_picks: vec![
                PlayerPickEntity {
                    player_id: "p1".into(),
                    contestant_id: "c1".into(),
                },
                PlayerPickEntity {
                    player_id: "p1".into(),
                    contestant_id: "c6".into(),
                },
            ],
        }
    }

    /// Delegates to a memory store but fails reads of one relation.
    struct FailingRead {
        inner: MemoryLeagueStore,
        failing: Relation,
    }

    impl FailingRead {
        fn fail<T: Send + 'static>(&self) -> BoxFuture<'static, StorageResult<T>> {
            let relation = self.failing;
            Box::pin(async move {
                Err(StorageError::unavailable(
                    format!("{} unreachable", relation.table()),
                    io::Error::other("unreachable"),
                ))
            })
        }
    }

    impl LeagueStore for FailingRead {
        fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
            match self.failing {
                Relation::Players => self.fail(),
                _ => self.inner.list_players(),
            }
        }

        fn list_contestants(&self) -> BoxFuture<'static, StorageResult<Vec<ContestantEntity>>> {
            match self.failing {
                Relation::Contestants => self.fail(),
                _ => self.inner.list_contestants(),
            }
        }

        fn list_weekly_scores(
            &self,
        ) -> BoxFuture<'static, StorageResult<Vec<WeeklyScoreEntity>>> {
            match self.failing {
                Relation::WeeklyScores => self.fail(),
                _ => self.inner.list_weekly_scores(),
            }
        }

        fn list_player_picks(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerPickEntity>>> {
            match self.failing {
                Relation::PlayerPicks => self.fail(),
                _ => self.inner.list_player_picks(),
            }
        }

        fn upsert_weekly_scores(
            &self,
            rows: Vec<WeeklyScoreEntity>,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.upsert_weekly_scores(rows)
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.health_check()
        }
    }

    /// Memory store whose picks relation goes down while `down` is set.
    struct Outage {
        inner: MemoryLeagueStore,
        down: Arc<AtomicBool>,
    }

    impl LeagueStore for Outage {
        fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
            self.inner.list_players()
        }

        fn list_contestants(&self) -> BoxFuture<'static, StorageResult<Vec<ContestantEntity>>> {
            self.inner.list_contestants()
        }

        fn list_weekly_scores(
            &self,
        ) -> BoxFuture<'static, StorageResult<Vec<WeeklyScoreEntity>>> {
            self.inner.list_weekly_scores()
        }

        fn list_player_picks(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerPickEntity>>> {
            if self.down.load(Ordering::SeqCst) {
                return Box::pin(async {
                    Err(StorageError::unavailable(
                        "player_picks unreachable".into(),
                        io::Error::other("connection reset"),
                    ))
                });
            }
            self.inner.list_player_picks()
        }

        fn upsert_weekly_scores(
            &self,
            rows: Vec<WeeklyScoreEntity>,
        ) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.upsert_weekly_scores(rows)
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.inner.health_check()
        }
    }

    #[tokio::test]
    async fn load_maps_rows_and_derives_current_week() {
        let store = MemoryLeagueStore::from_seed(seed());
        let snapshot = load_snapshot(&store).await.unwrap();

        let names: Vec<&str> = snapshot
            .members()
            .iter()
            .map(|member| member.name.as_str())
            .collect();
        assert_eq!(names, vec!["Carlos Vega", "Maria Vega"]);
        assert_eq!(snapshot.current_week(), 3);
        assert_eq!(snapshot.picks_for(&"p1".into()).len(), 2);
        assert!(snapshot.picks_for(&"p2".into()).is_empty());
    }

    #[tokio::test]
    async fn empty_store_loads_week_one() {
        let snapshot = load_snapshot(&MemoryLeagueStore::new()).await.unwrap();
        assert_eq!(snapshot.current_week(), 1);
        assert!(snapshot.members().is_empty());
    }

    #[tokio::test]
    async fn failing_relation_is_named() {
        for relation in [
            Relation::Players,
            Relation::Contestants,
            Relation::WeeklyScores,
            Relation::PlayerPicks,
        ] {
            let store = FailingRead {
                inner: MemoryLeagueStore::from_seed(seed()),
                failing: relation,
            };
            match load_snapshot(&store).await {
                Err(ServiceError::FetchFailure { relation: failed, .. }) => {
                    assert_eq!(failed, relation)
                }
                other => panic!("expected fetch failure, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn refresh_publishes_snapshot() {
        let state = AppState::new(
            Arc::new(MemoryLeagueStore::from_seed(seed())),
            AppConfig::default(),
        );
        assert_eq!(state.load_phase().await, LoadPhase::Loading);

        let week = refresh(&state).await.unwrap();

        assert_eq!(week, 3);
        assert_eq!(state.load_phase().await, LoadPhase::Ready);
        assert_eq!(state.ready_snapshot().await.unwrap().members().len(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let state = AppState::new(
            Arc::new(FailingRead {
                inner: MemoryLeagueStore::from_seed(seed()),
                failing: Relation::PlayerPicks,
            }),
            AppConfig::default(),
        );

        let err = refresh(&state).await.unwrap_err();

        assert_eq!(err.to_string(), "Picks fetch failed: player_picks unreachable");
        assert_eq!(
            state.load_phase().await,
            LoadPhase::Failed("Picks fetch failed: player_picks unreachable".into())
        );
        assert!(state.snapshot().await.members().is_empty());
        assert!(matches!(
            state.ready_snapshot().await,
            Err(ServiceError::LoadFailed(_))
        ));
    }

    #[tokio::test]
    async fn reload_failure_keeps_loaded_league_until_the_next_success() {
        let down = Arc::new(AtomicBool::new(false));
        let state = AppState::new(
            Arc::new(Outage {
                inner: MemoryLeagueStore::from_seed(seed()),
                down: down.clone(),
            }),
            AppConfig::default(),
        );
        refresh(&state).await.unwrap();
        let loaded = state.snapshot().await;

        down.store(true, Ordering::SeqCst);
        refresh(&state).await.unwrap_err();

        let kept = state.snapshot().await;
        assert!(Arc::ptr_eq(&loaded, &kept));
        assert_eq!(kept.members().len(), 2);
        assert_eq!(kept.current_week(), 3);
        assert!(matches!(state.load_phase().await, LoadPhase::Failed(_)));
        assert!(matches!(
            state.ready_snapshot().await,
            Err(ServiceError::LoadFailed(_))
        ));

        down.store(false, Ordering::SeqCst);
        let week = refresh(&state).await.unwrap();

        assert_eq!(week, 3);
        assert_eq!(state.load_phase().await, LoadPhase::Ready);
        assert_eq!(state.ready_snapshot().await.unwrap().members().len(), 2);
        assert!(state.status().await.loaded_at.is_some());
    }

    #[tokio::test]
    async fn refresh_is_rejected_while_a_write_is_running() {
        let state = AppState::new(Arc::new(MemoryLeagueStore::new()), AppConfig::default());
        let _gate = state.try_write_gate().unwrap();

        assert!(matches!(refresh(&state).await, Err(ServiceError::Busy)));
    }
}
