use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::common::ContestantSummary;

/// Raw points value as typed into the admin form.
#[derive(Debug, Clone, Deserialize, ToSchema, PartialEq)]
#[serde(untagged)]
pub enum PointsInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

/// One contestant's points for the week being saved.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScoreInput {
    #[validate(length(min = 1))]
    pub contestant_id: String,
    /// Missing, blank, or non-numeric values count as zero.
    #[serde(default)]
    pub points: Option<PointsInput>,
}

/// Payload saving a batch of weekly scores.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveScoresRequest {
    #[validate(range(min = 1))]
    pub week_number: u32,
    #[validate(nested)]
    pub scores: Vec<ScoreInput>,
}

/// Result of a successful save.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveScoresResponse {
    pub week_number: u32,
    pub current_week: u32,
    pub saved: usize,
}

/// One contestant line of the admin week form.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekFormRow {
    pub contestant: ContestantSummary,
    /// Prefilled points, only for picked contestants with a positive score this week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
    /// Eliminated contestants are shown read-only.
    pub editable: bool,
}

/// Admin form for entering one week's scores.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekFormResponse {
    pub week_number: u32,
    pub current_week: u32,
    pub week_options: Vec<u32>,
    pub max_weekly_points: i32,
    pub contestants: Vec<WeekFormRow>,
}
