//! Metric report routes: `POST /<metric>` for every catalog entry.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, middleware::auth::AuthUser};
use painel_core::period::{PeriodError, ReportPeriod};
use painel_core::reports::{Metric, ReportResult, ReportService};
use painel_core::tenancy::resolve_scope;
use painel_shared::CompanyCode;

/// Body shared by every metric endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRequest {
    /// Year.
    pub ano: Option<i64>,
    /// Months, 1-12.
    pub meses: Option<Vec<i64>>,
    /// Company codes (administrators only).
    #[serde(alias = "codigo_empresa")]
    pub empresas: Option<Vec<CompanyCode>>,
}

impl ReportRequest {
    /// Validates year and months.
    fn period(&self) -> Result<ReportPeriod, PeriodError> {
        let ano = self.ano.ok_or(PeriodError::MissingYear)?;
        let year = i32::try_from(ano).map_err(|_| PeriodError::InvalidYear(ano))?;
        let months = self.meses.as_deref().ok_or(PeriodError::NoMonths)?;
        ReportPeriod::new(year, months)
    }
}

/// Creates the report router with one route per metric.
pub fn routes() -> Router<AppState> {
    Metric::ALL.iter().fold(Router::new(), |router, &metric| {
        router.route(
            &format!("/{}", metric.slug()),
            post(
                move |State(state): State<AppState>,
                      auth: AuthUser,
                      payload: Result<Json<ReportRequest>, JsonRejection>| async move {
                    run_report(metric, &state, &auth, payload).await
                },
            ),
        )
    })
}

/// Validates the request, resolves the scope and runs the metric.
async fn run_report(
    metric: Metric,
    state: &AppState,
    auth: &AuthUser,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportResult>, ApiError> {
    let Json(request) = payload?;
    let period = request.period()?;
    let scope = resolve_scope(auth.claims(), request.empresas.as_deref())?;

    info!(
        metric = metric.slug(),
        account_id = auth.account_id(),
        companies = ?scope.codes(),
        ano = period.year(),
        meses = ?period.months(),
        "Running report"
    );

    let result = ReportService::new(state.erp.as_ref(), &state.exclusions)
        .run(metric, scope, &period)
        .await?;
    Ok(Json(result))
}
