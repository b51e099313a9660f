use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    config::ScoringRule,
    dto::{
        common::{ContestantSummary, MemberSummary},
        format_system_time,
        phase::VisibleLoadPhase,
    },
    state::LeagueStatus,
};

/// Load phase and snapshot metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeagueStatusResponse {
    pub phase: VisibleLoadPhase,
    /// Failure message of the last load, present while `phase` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub current_week: u32,
    pub member_count: usize,
    pub contestant_count: usize,
    pub score_count: usize,
    /// RFC 3339 timestamp of the last successful load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
}

impl From<&LeagueStatus> for LeagueStatusResponse {
    fn from(status: &LeagueStatus) -> Self {
        Self {
            phase: VisibleLoadPhase::from(&status.phase),
            error: VisibleLoadPhase::error_of(&status.phase),
            current_week: status.snapshot.current_week(),
            member_count: status.snapshot.members().len(),
            contestant_count: status.snapshot.contestants().len(),
            score_count: status.snapshot.weekly_scores().len(),
            loaded_at: status.loaded_at.map(format_system_time),
        }
    }
}

/// One ranked line of the season leaderboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardRow {
    /// 1-based position; tied members keep distinct positions in member order.
    pub rank: usize,
    pub member: MemberSummary,
    pub total_points: i64,
}

/// Season standings.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub current_week: u32,
    pub standings: Vec<LeaderboardRow>,
    /// Highest season total, absent without members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_points: Option<i64>,
    /// Rounded mean season total, absent without members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_points: Option<i64>,
}

/// Query parameters for the weekly breakdown.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct WeekQuery {
    /// Week to show. Defaults to the current week.
    #[validate(range(min = 1))]
    pub week: Option<u32>,
    /// Order members by week total instead of member order.
    #[serde(default)]
    pub ranked: bool,
}

/// Points one picked contestant earned in the selected week.
#[derive(Debug, Serialize, ToSchema)]
pub struct PickScore {
    pub contestant_id: String,
    /// Absent when the pick does not resolve to a known contestant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contestant: Option<ContestantSummary>,
    pub points: i32,
}

/// One member's line for the selected week.
#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownRow {
    pub member: MemberSummary,
    pub week_total: i64,
    /// Week total relative to the best week total, from 0 to 100.
    pub share_of_max: f64,
    pub contestant_scores: Vec<PickScore>,
}

/// Every contestant with the points credited through the picks for the selected week.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContestantWeekRow {
    pub contestant: ContestantSummary,
    /// Absent when nobody picked the contestant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
}

/// Weekly breakdown for a single week.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeeklyBreakdownResponse {
    pub week_number: u32,
    pub current_week: u32,
    pub week_options: Vec<u32>,
    pub max_week_total: i64,
    pub members: Vec<BreakdownRow>,
    pub contestants: Vec<ContestantWeekRow>,
}

/// Resolved roster slot on a tribe card.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntry {
    pub contestant: ContestantSummary,
    pub total_points: i64,
}

/// A member's roster with its season total and status counts.
#[derive(Debug, Serialize, ToSchema)]
pub struct TribeCardResponse {
    pub member: MemberSummary,
    pub total_points: i64,
    pub roster: Vec<RosterEntry>,
    pub active_count: usize,
    pub eliminated_count: usize,
    pub picks_remaining: usize,
}

/// Roster overview across the whole league.
#[derive(Debug, Serialize, ToSchema)]
pub struct TribesResponse {
    pub roster_size: usize,
    pub active_contestants: usize,
    pub eliminated_contestants: usize,
    pub tribes: Vec<TribeCardResponse>,
}

/// One rulebook line.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoringRuleResponse {
    pub title: String,
    pub points: i32,
    pub description: String,
}

impl From<&ScoringRule> for ScoringRuleResponse {
    fn from(rule: &ScoringRule) -> Self {
        Self {
            title: rule.title.clone(),
            points: rule.points,
            description: rule.description.clone(),
        }
    }
}

/// Informational scoring rulebook. Weekly points are entered by hand.
#[derive(Debug, Serialize, ToSchema)]
pub struct RulesResponse {
    pub rules: Vec<ScoringRuleResponse>,
}
