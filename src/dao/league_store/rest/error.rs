//! Error types shared by the REST gateway implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`RestDaoError`] failures.
pub type RestResult<T> = Result<T, RestDaoError>;

/// Failures that can occur while talking to the REST gateway.
#[derive(Debug, Error)]
pub enum RestDaoError {
    /// Required environment variable is missing.
    #[error("missing gateway environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build gateway client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request to a table endpoint could not be sent.
    #[error("failed to send gateway request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The gateway answered with a non-success status code.
    #[error("gateway returned {status} for `{path}`: {message}")]
    RequestStatus {
        path: String,
        status: StatusCode,
        message: String,
    },
    /// Response payload could not be decoded into the expected rows.
    #[error("failed to decode gateway response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<RestDaoError> for StorageError {
    fn from(err: RestDaoError) -> Self {
        let message = match &err {
            RestDaoError::RequestStatus { message, .. } => message.clone(),
            other => other.to_string(),
        };
        match err {
            RestDaoError::RequestStatus { .. } => StorageError::rejected(message, err),
            _ => StorageError::unavailable(message, err),
        }
    }
}
