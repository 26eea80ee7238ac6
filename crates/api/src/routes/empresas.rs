//! ERP company directory.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, middleware::auth::AuthUser};
use painel_core::reports::{Company, list_companies};
use painel_core::tenancy::resolve_scope;
use painel_shared::{AppError, CompanyCode};

/// Creates the company directory router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/empresas", get(list))
}

/// Query parameters: `?empresas=1,2,3`.
#[derive(Debug, Default, Deserialize)]
pub struct CompaniesQuery {
    /// Comma-separated company codes (administrators only).
    pub empresas: Option<String>,
}

/// Parses a comma-separated code list. Blank input means no list.
fn parse_codes(raw: Option<&str>) -> Result<Option<Vec<CompanyCode>>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    raw.split(',')
        .map(|part| {
            part.trim().parse::<CompanyCode>().map_err(|_| {
                ApiError(AppError::Validation(format!(
                    "empresas must be a comma-separated list of integers, got '{part}'"
                )))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// GET /empresas - Companies visible to the caller.
///
/// Regular accounts see their own companies. Administrators see the listed
/// codes, or every company when no list is given.
async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CompaniesQuery>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let requested = parse_codes(query.empresas.as_deref())?;

    let codes = if auth.is_admin() && requested.is_none() {
        None
    } else {
        Some(resolve_scope(auth.claims(), requested.as_deref())?.into_codes())
    };

    let companies = list_companies(state.erp.as_ref(), codes.as_deref()).await?;
    Ok(Json(companies))
}
