//! Report generation service.

use tracing::{debug, error};

use super::aggregate::aggregate;
use super::error::ReportError;
use super::exclusion::ExclusionSet;
use super::metric::Metric;
use super::query::build_report_query;
use super::source::ErpSource;
use super::types::ReportResult;
use crate::period::ReportPeriod;
use crate::tenancy::TenantScope;

/// Runs metric reports against an ERP source.
pub struct ReportService<'a> {
    source: &'a dyn ErpSource,
    exclusions: &'a ExclusionSet,
}

impl<'a> ReportService<'a> {
    /// Creates a service over a source and the start-up exclusion set.
    #[must_use]
    pub fn new(source: &'a dyn ErpSource, exclusions: &'a ExclusionSet) -> Self {
        Self { source, exclusions }
    }

    /// Produces one metric for every company in `scope` over `period`.
    ///
    /// Issues exactly one ERP query. Any failure fails the whole report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Erp` when the query fails or times out.
    pub async fn run(
        &self,
        metric: Metric,
        scope: TenantScope,
        period: &ReportPeriod,
    ) -> Result<ReportResult, ReportError> {
        let spec = metric.spec();
        let query = build_report_query(&spec, scope.codes(), period);
        debug!(metric = metric.slug(), sql = %query.sql, params = ?query.params, "Running report query");

        let rows = self
            .source
            .query(&query)
            .await
            .inspect_err(|e| error!(metric = metric.slug(), error = %e, "Report query failed"))?;

        let aggregate = aggregate(scope.codes(), &rows, &spec, self.exclusions);
        debug!(metric = metric.slug(), rows = rows.len(), "Report aggregated");

        Ok(ReportResult::from_aggregate(
            metric,
            period,
            scope.into_codes(),
            aggregate,
        ))
    }
}
