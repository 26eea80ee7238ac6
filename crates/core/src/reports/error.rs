//! Report error types.

use thiserror::Error;

use super::source::ErpError;
use crate::period::PeriodError;
use crate::tenancy::ScopeError;

/// Errors that can occur while producing a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Invalid year or month list.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// The caller's company scope could not be resolved.
    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// The ERP query failed.
    #[error(transparent)]
    Erp(#[from] ErpError),
}
