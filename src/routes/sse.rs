use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Public SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream load phase changes and score updates to connected frontends.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = sse_service::subscribe_public(&state);
    info!("New public SSE connection");
    sse_service::broadcast_public_info(&state, "public stream connected");
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/public", get(public_stream))
}
