//! Client error types.

use thiserror::Error;

use crate::response::ResponseBody;

// ============================================================================
// Main API Error
// ============================================================================

/// Error returned by every gateway call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway answered with a non-2xx status.
    ///
    /// `message` is taken from the payload's `error` or `message` field,
    /// then the raw body, then the status text.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Normalized error message.
        message: String,
        /// Parsed body (JSON) or raw text.
        data: ResponseBody,
        /// The 401 tore down the stored session.
        session_expired: bool,
    },

    /// A retryable request failed at the transport level twice.
    #[error("Unable to reach the gateway at {url} after {attempts} attempts: {source}")]
    Connectivity {
        /// Request URL.
        url: String,
        /// Attempts made.
        attempts: u32,
        /// Last transport failure.
        #[source]
        source: TransportError,
    },

    /// A non-retryable request failed at the transport level.
    #[error("Request to {url} failed: {source}")]
    Transport {
        /// Request URL.
        url: String,
        /// Transport failure.
        #[source]
        source: TransportError,
    },

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header value contained characters HTTP does not allow.
    #[error("Invalid value for header {0}")]
    InvalidHeader(String),

    /// The request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A successful response did not have the expected shape.
    #[error("Unexpected response payload: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns the HTTP status for [`ApiError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the response payload for [`ApiError::Http`].
    pub fn data(&self) -> Option<&ResponseBody> {
        match self {
            ApiError::Http { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Returns true if this response cleared the stored session.
    ///
    /// A 401 from an open auth path (wrong password, stale reset link) is
    /// an ordinary failure and returns false.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            ApiError::Http {
                session_expired: true,
                ..
            }
        )
    }

    /// Returns true if the request timed out before a response arrived.
    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Transport { source, .. } | ApiError::Connectivity { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Connectivity { .. })
    }
}

// ============================================================================
// Transport Error
// ============================================================================

/// Failure to complete an HTTP exchange at all.
#[derive(Debug, Error)]
pub enum TransportError {
    /// reqwest failed to send the request or read the response.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),
}

impl TransportError {
    /// Returns true for timeouts.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Request(e) => e.is_timeout(),
            TransportError::Connect(_) => false,
        }
    }
}
