use std::error::Error;
use thiserror::Error;

/// Result alias for remote store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by store backends regardless of the underlying service.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store could not be reached or answered with a server-side failure.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Human-readable context for the failure.
        message: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The store understood the request and refused it (constraint violation,
    /// malformed filter). Not a connectivity problem.
    #[error("store rejected the operation: {message}")]
    Rejected {
        /// Human-readable context for the rejection.
        message: String,
    },
}

impl StorageError {
    /// Wrap any backend failure as an unavailability error.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Build a rejection error carrying the store's complaint.
    pub fn rejected(message: impl Into<String>) -> Self {
        StorageError::Rejected {
            message: message.into(),
        }
    }
}
