//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A unique account attribute is already taken.
    #[error("Uniqueness violation: {0}")]
    UniquenessViolation(String),

    /// Wrong email or password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session token was supplied.
    #[error("Missing session token")]
    MissingToken,

    /// Session token has a bad signature, is malformed or expired.
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An ERP query failed.
    #[error("Upstream query failed: {0}")]
    UpstreamQuery(String),

    /// An ERP query exceeded its time budget.
    #[error("Upstream query timed out: {0}")]
    UpstreamTimeout(String),

    /// No ERP connection could be obtained.
    #[error("Upstream connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// Account store error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::UniquenessViolation(_) => 400,
            Self::InvalidCredentials | Self::MissingToken => 401,
            Self::InvalidToken(_) | Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::UpstreamQuery(_) | Self::Database(_) | Self::Internal(_) => 500,
            Self::ConnectionUnavailable(_) => 503,
            Self::UpstreamTimeout(_) => 504,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::UniquenessViolation(_) => "uniqueness_violation",
            Self::InvalidCredentials => "invalid_credentials",
            Self::MissingToken => "missing_token",
            Self::InvalidToken(_) => "invalid_token",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::UpstreamQuery(_) => "upstream_query_error",
            Self::UpstreamTimeout(_) => "upstream_timeout",
            Self::ConnectionUnavailable(_) => "connection_unavailable",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns true when the message carries internals that stay server-side.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::UpstreamQuery(_)
                | Self::UpstreamTimeout(_)
                | Self::ConnectionUnavailable(_)
                | Self::Database(_)
                | Self::Internal(_)
        )
    }

    /// Returns the client-facing detail message.
    ///
    /// Internal errors get a generic message; the original is only logged.
    #[must_use]
    pub fn public_details(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::UniquenessViolation(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::MissingToken => {
                "A session token is required (Authorization: Bearer or token cookie)".to_string()
            }
            Self::InvalidToken(_) => "Session token is invalid or expired".to_string(),
            Self::UpstreamQuery(_) => "The ERP query failed".to_string(),
            Self::UpstreamTimeout(_) => "The ERP query timed out".to_string(),
            Self::ConnectionUnavailable(_) => "The ERP database is unavailable".to_string(),
            Self::Database(_) | Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
