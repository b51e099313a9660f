use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::{league_store::Relation, storage::StorageError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One of the four bulk reads failed; no snapshot was published.
    #[error("{relation} fetch failed: {}", .source.message())]
    FetchFailure {
        relation: Relation,
        #[source]
        source: StorageError,
    },
    /// The weekly score upsert failed; the snapshot is unchanged.
    #[error("failed to save scores: {}", .0.message())]
    SaveFailure(#[source] StorageError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Another load or save is still in flight.
    #[error("another load or save is already in progress")]
    Busy,
    /// The snapshot is being (re)loaded.
    #[error("league data is loading")]
    Loading,
    /// The last load failed; a refresh is required.
    #[error("league data unavailable: {0}")]
    LoadFailed(String),
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Conflict with an operation already running.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The gateway failed to serve a request.
    #[error("bad gateway: {0}")]
    BadGateway(String),
    /// Service unavailable or still loading.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            err @ (ServiceError::FetchFailure { .. } | ServiceError::SaveFailure(_)) => {
                AppError::BadGateway(err.to_string())
            }
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::Busy => AppError::Conflict(ServiceError::Busy.to_string()),
            ServiceError::Loading => AppError::ServiceUnavailable("league data is loading".into()),
            ServiceError::LoadFailed(message) => AppError::ServiceUnavailable(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
