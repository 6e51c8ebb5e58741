//! Error types shared by the REST storage backend.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`RestStoreError`] failures.
pub type RestResult<T> = Result<T, RestStoreError>;

/// Failures that can occur while talking to the hosted data store.
#[derive(Debug, Error)]
pub enum RestStoreError {
    /// Required environment variable is missing.
    #[error("missing store environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build store HTTP client")]
    ClientBuilder {
        /// Underlying client construction failure.
        #[source]
        source: reqwest::Error,
    },
    /// A request to a table endpoint could not be sent.
    #[error("failed to send store request to `{path}`")]
    RequestSend {
        /// Table path the request targeted.
        path: String,
        /// Transport-level cause.
        #[source]
        source: reqwest::Error,
    },
    /// The store returned an unexpected status code.
    #[error("unexpected store response status {status} for `{path}`")]
    RequestStatus {
        /// Table path the request targeted.
        path: String,
        /// Status the store answered with.
        status: StatusCode,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode store response for `{path}`")]
    DecodeResponse {
        /// Table path the request targeted.
        path: String,
        /// Deserialization cause.
        #[source]
        source: reqwest::Error,
    },
    /// A write asked for its representation back and got an empty set.
    #[error("store returned no representation for insert into `{table}`")]
    EmptyRepresentation {
        /// Table the write targeted.
        table: &'static str,
    },
    /// A timestamp column did not parse as RFC 3339.
    #[error("invalid timestamp in column `{column}`")]
    InvalidTimestamp {
        /// Column carrying the malformed value.
        column: &'static str,
        /// Parse failure detail.
        #[source]
        source: time::error::Parse,
    },
}
