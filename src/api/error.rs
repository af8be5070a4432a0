//! Remote API error taxonomy
//!
//! Every failed request against a source site ends up as one of these
//! variants. The variant is chosen from the transport status alone, so the
//! same server behaviour always surfaces the same message to the operator.
//!
//! # Error Types
//!
//! - **`BadRequest`**: HTTP 400, carries the server-provided `message` field
//! - **`PermissionDenied`**: HTTP 403 (the AJAX header makes the server answer
//!   with 403 instead of redirecting to a login page)
//! - **`ServerError`**: HTTP 500
//! - **`UnrecognizedStatus`**: any other status, including other 2xx codes
//! - **`MalformedResponse`**: a 200 response whose body is missing fields
//! - **`Transport`**: no response at all (DNS, TLS, timeout, ...)
//! - **`Unsupported`**: rejected locally before any request was sent

use thiserror::Error;

/// Errors produced while talking to a source site
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server rejected the query (HTTP 400)
    #[error("API Error: {0}")]
    BadRequest(String),

    /// Authentication or permission failure (HTTP 403)
    #[error("You haven't got permission to view this. Please log in again.")]
    PermissionDenied,

    /// The server failed internally (HTTP 500)
    #[error("Internal server error")]
    ServerError,

    /// Any other status
    #[error("Unrecognised status code: {reason} ({code})")]
    UnrecognizedStatus { code: u16, reason: String },

    /// Successful status but the body did not have the expected shape
    #[error("Unexpected response from the server")]
    MalformedResponse { detail: String },

    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The adapter cannot express this query for its resource kind
    #[error("Unsupported query: {0}")]
    Unsupported(String),
}

/// Discriminant of [`ApiError`], cheap to copy into state and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    PermissionDenied,
    ServerError,
    UnrecognizedStatus,
    MalformedResponse,
    Transport,
    Unsupported,
}

impl ApiError {
    /// Build a `MalformedResponse` from any displayable parse failure
    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        Self::MalformedResponse {
            detail: detail.to_string(),
        }
    }

    /// The kind of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::ServerError => ErrorKind::ServerError,
            Self::UnrecognizedStatus { .. } => ErrorKind::UnrecognizedStatus,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    /// Message shown to the operator in the error view
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
