use axum::Router;

use crate::state::SharedState;

/// Score entry endpoints.
pub mod admin;
/// OpenAPI document and Swagger UI.
pub mod docs;
/// Liveness and gateway health.
pub mod health;
/// Read-only league views.
pub mod public;
/// Server-sent event stream.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(public::router())
        .merge(admin::router())
        .merge(sse::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
