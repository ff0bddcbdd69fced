use thiserror::Error;

/// Errors from [`crate::store::RemoteStore`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The table name was empty.
    #[error("table name must not be empty")]
    InvalidTable,
    /// The store answered with a non-success status.
    #[error("insert into {table} failed with status {status}: {body}")]
    Rejected {
        /// Target table.
        table: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The request failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// A success response carried a body that is not JSON.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Request URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
}

impl StoreError {
    /// HTTP status of a rejected call.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of a rejected call.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}
