use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the league backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::public::get_status,
        crate::routes::public::get_leaderboard,
        crate::routes::public::get_weekly_breakdown,
        crate::routes::public::get_tribes,
        crate::routes::public::get_rules,
        crate::routes::public::refresh,
        crate::routes::admin::get_week_form,
        crate::routes::admin::save_scores,
        crate::routes::sse::public_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::phase::VisibleLoadPhase,
            crate::dto::sse::LoadPhaseEvent,
            crate::dto::sse::ScoresUpdatedEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "public", description = "League standings"),
        (name = "admin", description = "Weekly score entry"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
