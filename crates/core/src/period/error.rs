//! Period validation errors.

use thiserror::Error;

/// Errors raised while validating a year/month selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// No year in the request.
    #[error("ano is required")]
    MissingYear,

    /// Year outside the accepted range.
    #[error("ano must be between 1900 and 2999, got {0}")]
    InvalidYear(i64),

    /// Month outside 1-12.
    #[error("meses must contain integers between 1 and 12, got {0}")]
    InvalidMonth(i64),

    /// Empty month list.
    #[error("meses must be a non-empty list")]
    NoMonths,
}
