//! Error types for the data layer.

use thiserror::Error;

/// Failure reported by a [`crate::RemoteStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The HTTP round trip itself failed (DNS, TLS, connection reset, ...).
    #[error("request to remote store failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("remote store rejected `{table}` request ({status}): {message}")]
    Rejected {
        table: String,
        status: u16,
        message: String,
    },

    /// A row came back in a shape that does not match the record type.
    #[error("malformed `{table}` row: {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    /// Update or delete was issued without any filter.
    #[error("refusing to {op} every row of `{table}` without a filter")]
    Unfiltered { op: &'static str, table: String },

    /// The backend is not accepting writes.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a [`crate::RecordManager`] operation.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A required form field was left blank.
    #[error("{field} is required")]
    Missing { field: &'static str },
}
