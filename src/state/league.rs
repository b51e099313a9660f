use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::dao::models::{ContestantEntity, PlayerEntity, WeeklyScoreEntity};

/// Scoring period key. Weeks start at 1.
pub type WeekNumber = u32;

/// Opaque identifier of a family member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Wrap a raw gateway id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Opaque identifier of a contestant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContestantId(String);

impl ContestantId {
    /// Wrap a raw gateway id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContestantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ContestantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContestantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A show contestant that can be drafted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contestant {
    /// Gateway id.
    pub id: ContestantId,
    /// Display name.
    pub name: String,
    /// Tribe label (e.g. "Blue").
    pub tribe: String,
    /// Only ever flips from `false` to `true` during a season.
    pub is_eliminated: bool,
}

/// A league participant owning draft picks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMember {
    /// Gateway id.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Display color, irrelevant to scoring.
    pub color: String,
}

/// Points one contestant earned in one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyScore {
    /// Week the points belong to.
    pub week_number: WeekNumber,
    /// Scoring contestant.
    pub contestant_id: ContestantId,
    /// Points earned, may be negative.
    pub points: i32,
}

/// One `(contestant, points)` pair submitted to the score mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Scoring contestant.
    pub contestant_id: ContestantId,
    /// Points already coerced to the accepted range.
    pub points: i32,
}

impl ScoreEntry {
    /// Entry crediting `points` to `contestant_id`.
    pub fn new(contestant_id: impl Into<String>, points: i32) -> Self {
        Self {
            contestant_id: ContestantId::new(contestant_id),
            points,
        }
    }

    /// Gateway row for this entry in `week_number`.
    pub fn to_entity(&self, week_number: WeekNumber) -> WeeklyScoreEntity {
        WeeklyScoreEntity {
            week_number,
            contestant_id: self.contestant_id.as_str().to_string(),
            points: self.points,
        }
    }
}

impl From<PlayerEntity> for FamilyMember {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: MemberId::new(entity.id),
            name: entity.name,
            color: entity.color,
        }
    }
}

impl From<ContestantEntity> for Contestant {
    fn from(entity: ContestantEntity) -> Self {
        Self {
            id: ContestantId::new(entity.id),
            name: entity.name,
            tribe: entity.tribe,
            is_eliminated: entity.is_eliminated,
        }
    }
}

impl From<WeeklyScoreEntity> for WeeklyScore {
    fn from(entity: WeeklyScoreEntity) -> Self {
        Self {
            week_number: entity.week_number,
            contestant_id: ContestantId::new(entity.contestant_id),
            points: entity.points,
        }
    }
}
