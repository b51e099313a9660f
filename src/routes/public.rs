use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::public::{
        LeaderboardResponse, LeagueStatusResponse, RulesResponse, TribesResponse, WeekQuery,
        WeeklyBreakdownResponse,
    },
    error::AppError,
    services::{league_service, public_service},
    state::SharedState,
};

/// Public read-only endpoints exposing the league standings.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/status", get(get_status))
        .route("/public/leaderboard", get(get_leaderboard))
        .route("/public/weeks", get(get_weekly_breakdown))
        .route("/public/tribes", get(get_tribes))
        .route("/public/rules", get(get_rules))
        .route("/public/refresh", post(refresh))
}

#[utoipa::path(
    get,
    path = "/public/status",
    tag = "public",
    responses((status = 200, description = "Load phase and snapshot metadata", body = LeagueStatusResponse))
)]
/// Return the load phase, current week, and row counts of the published snapshot.
pub async fn get_status(State(state): State<SharedState>) -> Json<LeagueStatusResponse> {
    Json(public_service::get_status(&state).await)
}

#[utoipa::path(
    get,
    path = "/public/leaderboard",
    tag = "public",
    responses(
        (status = 200, description = "Season standings", body = LeaderboardResponse),
        (status = 503, description = "League data loading or unavailable")
    )
)]
/// Return members ranked by season total.
pub async fn get_leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let payload = public_service::get_leaderboard(&state).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/public/weeks",
    tag = "public",
    params(WeekQuery),
    responses(
        (status = 200, description = "Points per member for one week", body = WeeklyBreakdownResponse),
        (status = 400, description = "Invalid week"),
        (status = 503, description = "League data loading or unavailable")
    )
)]
/// Return each member's points for a single week.
pub async fn get_weekly_breakdown(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<WeekQuery>>,
) -> Result<Json<WeeklyBreakdownResponse>, AppError> {
    let payload = public_service::get_weekly_breakdown(&state, query).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/public/tribes",
    tag = "public",
    responses(
        (status = 200, description = "Roster card per member", body = TribesResponse),
        (status = 503, description = "League data loading or unavailable")
    )
)]
/// Return every member's drafted contestants with their season totals.
pub async fn get_tribes(
    State(state): State<SharedState>,
) -> Result<Json<TribesResponse>, AppError> {
    let payload = public_service::get_tribes(&state).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/public/rules",
    tag = "public",
    responses((status = 200, description = "Scoring rulebook", body = RulesResponse))
)]
/// Return the informational scoring rulebook.
pub async fn get_rules(State(state): State<SharedState>) -> Json<RulesResponse> {
    Json(public_service::get_rules(&state))
}

#[utoipa::path(
    post,
    path = "/public/refresh",
    tag = "public",
    responses(
        (status = 200, description = "Snapshot reloaded", body = LeagueStatusResponse),
        (status = 409, description = "A load or save is already running"),
        (status = 502, description = "A gateway read failed")
    )
)]
/// Refetch every relation from the gateway and publish the new snapshot.
pub async fn refresh(
    State(state): State<SharedState>,
) -> Result<Json<LeagueStatusResponse>, AppError> {
    league_service::refresh(&state).await?;
    Ok(Json(public_service::get_status(&state).await))
}
