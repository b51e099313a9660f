//! In-process league store used by tests and by deployments without a remote gateway.

use std::{fs, path::Path, sync::Arc};

use futures::future::BoxFuture;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::dao::{
    league_store::LeagueStore,
    models::{ContestantEntity, PlayerEntity, PlayerPickEntity, WeeklyScoreEntity},
    storage::StorageResult,
};

/// Failures raised while seeding the in-memory store.
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("failed to read seed file `{path}`")]
    ReadSeed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seed file `{path}`")]
    ParseSeed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Initial rows for the in-memory store, in gateway wire format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// `players` rows.
    #[serde(default)]
    pub players: Vec<PlayerEntity>,
    /// `contestants` rows.
    #[serde(default)]
    pub contestants: Vec<ContestantEntity>,
    /// `weekly_scores` rows.
    #[serde(default)]
    pub weekly_scores: Vec<WeeklyScoreEntity>,
    /// `player_picks` rows.
    #[serde(default)]
    pub player_picks: Vec<PlayerPickEntity>,
}

impl SeedData {
    /// Read seed rows from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, MemoryStoreError> {
        let contents = fs::read_to_string(path).map_err(|source| MemoryStoreError::ReadSeed {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| MemoryStoreError::ParseSeed {
            path: path.display().to_string(),
            source,
        })
    }
}

/// League store keeping every relation in memory behind a shared lock.
#[derive(Clone, Default)]
pub struct MemoryLeagueStore {
    tables: Arc<RwLock<SeedData>>,
}

impl MemoryLeagueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `seed`.
    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            tables: Arc::new(RwLock::new(seed)),
        }
    }

    /// Copy of the stored weekly scores in insertion order.
    pub async fn weekly_scores(&self) -> Vec<WeeklyScoreEntity> {
        self.tables.read().await.weekly_scores.clone()
    }
}

impl LeagueStore for MemoryLeagueStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let mut rows = tables.read().await.players.clone();
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(rows)
        })
    }

    fn list_contestants(&self) -> BoxFuture<'static, StorageResult<Vec<ContestantEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let mut rows = tables.read().await.contestants.clone();
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(rows)
        })
    }

    fn list_weekly_scores(&self) -> BoxFuture<'static, StorageResult<Vec<WeeklyScoreEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let mut rows = tables.read().await.weekly_scores.clone();
            rows.sort_by_key(|row| row.week_number);
            Ok(rows)
        })
    }

    fn list_player_picks(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerPickEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move { Ok(tables.read().await.player_picks.clone()) })
    }

    fn upsert_weekly_scores(
        &self,
        rows: Vec<WeeklyScoreEntity>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let mut guard = tables.write().await;
            let scores = &mut guard.weekly_scores;
            for row in rows {
                let existing = scores.iter().position(|existing| {
                    existing.week_number == row.week_number
                        && existing.contestant_id == row.contestant_id
                });
                match existing.and_then(|index| scores.get_mut(index)) {
                    Some(existing) => existing.points = row.points,
                    None => scores.push(row),
                }
            }
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
