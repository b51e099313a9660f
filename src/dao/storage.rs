use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying gateway.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("storage rejected the request: {message}")]
    Rejected {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct an error for a request the backend answered but refused.
    pub fn rejected(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Rejected {
            message,
            source: Box::new(source),
        }
    }

    /// Human readable cause, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            StorageError::Unavailable { message, .. } | StorageError::Rejected { message, .. } => {
                message
            }
        }
    }
}
