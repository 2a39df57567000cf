//! Caller-facing error categories.
//!
//! Every internal failure is reduced to one of three categories before it
//! crosses the transport boundary. The category decides the status code; the
//! message is the human-readable text shown to the caller.

use thiserror::Error;

/// Caller-facing status category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// The request itself is malformed.
    InvalidArgument,
    /// The referenced entity does not exist.
    NotFound,
    /// Anything the caller cannot fix by changing the request.
    Internal,
}

impl StatusCode {
    /// Returns the HTTP status code for this category.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidArgument => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
        }
    }
}

/// Application error returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Malformed caller input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested entity is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the status category of this error.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::InvalidArgument,
            Self::NotFound(_) => StatusCode::NotFound,
            Self::Internal(_) => StatusCode::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code().http_status()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.code().as_str()
    }

    /// Returns the caller-facing message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(msg) | Self::NotFound(msg) | Self::Internal(msg) => msg,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
