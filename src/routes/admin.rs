use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::admin::{SaveScoresRequest, SaveScoresResponse, WeekFormResponse},
    error::AppError,
    services::admin_service,
    state::SharedState,
};

/// Score entry endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/weeks/{week}", get(get_week_form))
        .route("/admin/scores", post(save_scores))
}

/// Return the score entry form for one week.
#[utoipa::path(
    get,
    path = "/admin/weeks/{week}",
    tag = "admin",
    params(("week" = u32, Path, description = "Week to edit, starting at 1")),
    responses(
        (status = 200, description = "Week form", body = WeekFormResponse),
        (status = 400, description = "Invalid week"),
        (status = 503, description = "League data loading or unavailable")
    )
)]
pub async fn get_week_form(
    State(state): State<SharedState>,
    Path(week): Path<u32>,
) -> Result<Json<WeekFormResponse>, AppError> {
    Ok(Json(admin_service::week_form(&state, week).await?))
}

/// Save one week's scores and patch the published standings.
#[utoipa::path(
    post,
    path = "/admin/scores",
    tag = "admin",
    request_body = SaveScoresRequest,
    responses(
        (status = 200, description = "Scores saved", body = SaveScoresResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "A load or save is already running"),
        (status = 502, description = "The gateway refused the write")
    )
)]
pub async fn save_scores(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SaveScoresRequest>>,
) -> Result<Json<SaveScoresResponse>, AppError> {
    Ok(Json(admin_service::save_scores(&state, payload).await?))
}
