//! RPC error types.

use thiserror::Error;
use untis_core::{CoreError, ReferenceKind};

/// Errors that can occur when talking to the timetabling service.
///
/// Nothing in this crate retries. Every variant is returned to the immediate
/// caller and aborts the operation that produced it.
#[derive(Debug, Error)]
pub enum RpcError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// Service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The response `id` does not echo the request id.
    #[error("response id {actual:?} does not match request id {expected}")]
    IdentifierMismatch {
        /// Id sent with the request.
        expected: u64,
        /// Id found in the response, rendered as a string (`None` if absent or null).
        actual: Option<String>,
    },

    /// The operation needs an authenticated session.
    #[error("session is not authenticated")]
    NotAuthenticated,

    /// `authenticate` was called on a session that already left the
    /// unauthenticated state.
    #[error("session is already authenticated")]
    AlreadyAuthenticated,

    /// Name to id lookup found no matching reference record.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Listing that was searched.
        kind: ReferenceKind,
        /// Name that was looked up.
        name: String,
    },

    /// The payload is missing a field or has the wrong shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The service answered with a JSON-RPC `error` object.
    #[error("remote error {code}: {message}")]
    Remote {
        /// JSON-RPC error code.
        code: i64,
        /// Error message from the service.
        message: String,
    },

    /// The caller-supplied deadline passed before the call finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<CoreError> for RpcError {
    fn from(error: CoreError) -> Self {
        Self::MalformedResponse(error.to_string())
    }
}
