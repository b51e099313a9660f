/// Admin week form and score submission.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Snapshot loading and refresh.
pub mod league_service;
/// Public read-only league views.
pub mod public_service;
/// Weekly score persistence and snapshot patching.
pub mod score_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Leaderboard, weekly breakdown, and roster aggregations.
pub mod standings;
