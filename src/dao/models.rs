use serde::{Deserialize, Serialize};

/// Family member row (`players` relation). Extra columns such as `created_at` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the member.
    pub id: String,
    /// Display name of the member.
    pub name: String,
    /// Display color (CSS hex string).
    pub color: String,
}

/// Contestant row (`contestants` relation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContestantEntity {
    /// Stable identifier for the contestant.
    pub id: String,
    /// Contestant name as shown on the show.
    pub name: String,
    /// Tribe label the contestant currently belongs to.
    pub tribe: String,
    /// Whether the contestant has been voted out.
    pub is_eliminated: bool,
}

/// Points earned by one contestant in one week (`weekly_scores` relation).
///
/// `(week_number, contestant_id)` is unique in storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyScoreEntity {
    /// Scoring period the points belong to.
    pub week_number: u32,
    /// Contestant the points were earned by.
    pub contestant_id: String,
    /// Points earned, unbounded at this layer.
    pub points: i32,
}

/// Draft pick edge between a member and a contestant (`player_picks` relation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPickEntity {
    /// Member owning the pick.
    pub player_id: String,
    /// Picked contestant.
    pub contestant_id: String,
}
