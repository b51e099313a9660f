/// In-process store.
pub mod memory;
/// PostgREST gateway store.
#[cfg(feature = "rest-store")]
pub mod rest;

use std::fmt;

use crate::dao::models::{ContestantEntity, PlayerEntity, PlayerPickEntity, WeeklyScoreEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// The four relations the league is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Family members.
    Players,
    /// Show contestants.
    Contestants,
    /// Points per week and contestant.
    WeeklyScores,
    /// Draft pick edges.
    PlayerPicks,
}

impl Relation {
    /// Table name used by the remote gateway.
    pub fn table(self) -> &'static str {
        match self {
            Relation::Players => "players",
            Relation::Contestants => "contestants",
            Relation::WeeklyScores => "weekly_scores",
            Relation::PlayerPicks => "player_picks",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Relation::Players => "Players",
            Relation::Contestants => "Contestants",
            Relation::WeeklyScores => "Scores",
            Relation::PlayerPicks => "Picks",
        };
        f.write_str(label)
    }
}

/// Abstraction over the remote gateway holding the league relations.
///
/// Bulk reads return rows in the order documented on each method; the snapshot loader relies on
/// it for member and contestant ordering.
pub trait LeagueStore: Send + Sync {
    /// All members, ordered by name.
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// All contestants, ordered by name.
    fn list_contestants(&self) -> BoxFuture<'static, StorageResult<Vec<ContestantEntity>>>;
    /// All weekly scores, ordered by week number.
    fn list_weekly_scores(&self) -> BoxFuture<'static, StorageResult<Vec<WeeklyScoreEntity>>>;
    /// All draft picks in storage order.
    fn list_player_picks(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerPickEntity>>>;
    /// Insert or overwrite the given rows keyed by `(week_number, contestant_id)` in one batch.
    fn upsert_weekly_scores(
        &self,
        rows: Vec<WeeklyScoreEntity>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap round trip proving the gateway answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
