//! Conversion of domain errors into JSON `{error, details}` responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::{error, warn};

use painel_core::auth::{AccountRuleError, PasswordError};
use painel_core::period::PeriodError;
use painel_core::reports::{ErpError, ReportError};
use painel_core::tenancy::ScopeError;
use painel_db::UserError;
use painel_shared::{AppError, JwtError};

/// Handler error: an [`AppError`] that renders itself as a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_internal() {
            error!(error = %err, code = err.error_code(), "Request failed");
        } else {
            warn!(error = %err, code = err.error_code(), "Request rejected");
        }

        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": err.error_code(),
            "details": err.public_details(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<PeriodError> for ApiError {
    fn from(err: PeriodError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<ScopeError> for ApiError {
    fn from(err: ScopeError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<AccountRuleError> for ApiError {
    fn from(err: AccountRuleError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<ErpError> for ApiError {
    fn from(err: ErpError) -> Self {
        Self(match err {
            ErpError::Query(msg) => AppError::UpstreamQuery(msg),
            ErpError::Timeout(after) => AppError::UpstreamTimeout(format!("after {after:?}")),
            ErpError::ConnectionUnavailable(msg) => AppError::ConnectionUnavailable(msg),
        })
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Period(e) => e.into(),
            ReportError::Scope(e) => e.into(),
            ReportError::Erp(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        Self(match err {
            UserError::EmailTaken(_) | UserError::CnpjTaken(_) => {
                AppError::UniquenessViolation(err.to_string())
            }
            UserError::NotFound(id) => AppError::NotFound(format!("user {id} not found")),
            UserError::Database(e) => AppError::Database(e.to_string()),
        })
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}
