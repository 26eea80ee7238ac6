//! Report data types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use painel_shared::CompanyCode;

use super::aggregate::{Aggregate, round_amount};
use super::metric::{Metric, MetricKind};
use crate::period::ReportPeriod;

/// A rounded output value: a 2-place decimal string for money, an integer for
/// headcounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    /// Monetary total, e.g. `"1234.50"`.
    Amount(String),
    /// Headcount.
    Count(i64),
}

impl ReportValue {
    /// Renders an accumulated value for the given metric kind.
    #[must_use]
    pub fn new(kind: MetricKind, value: Decimal) -> Self {
        match kind {
            MetricKind::Amount => Self::Amount(format_money(value)),
            MetricKind::Count => Self::Count(i64::try_from(value.trunc()).unwrap_or(i64::MAX)),
        }
    }
}

/// Formats a Decimal as a string with 2 decimal places.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_amount(amount))
}

/// Response body of every metric endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    /// Metric slug.
    pub metric: Metric,
    /// Requested year.
    pub ano: i32,
    /// Requested months, duplicates collapsed.
    pub meses: Vec<u32>,
    /// Company codes the report covers.
    pub empresas: Vec<CompanyCode>,
    /// Grand total over every company and month.
    pub total: ReportValue,
    /// Total per company code.
    pub by_company: BTreeMap<CompanyCode, ReportValue>,
    /// Sum of excluded rows (entries/exits only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_total: Option<ReportValue>,
    /// Distinct excluded nature codes, sorted (entries/exits only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_codes: Option<Vec<i32>>,
}

impl ReportResult {
    /// Rounds an aggregate into the response shape.
    #[must_use]
    pub fn from_aggregate(
        metric: Metric,
        period: &ReportPeriod,
        empresas: Vec<CompanyCode>,
        aggregate: Aggregate,
    ) -> Self {
        let spec = metric.spec();
        let (excluded_total, excluded_codes) = if spec.uses_exclusions {
            (
                Some(ReportValue::new(spec.kind, aggregate.excluded_total)),
                Some(aggregate.excluded_codes.into_iter().collect()),
            )
        } else {
            (None, None)
        };

        Self {
            metric,
            ano: period.year(),
            meses: period.months(),
            empresas,
            total: ReportValue::new(spec.kind, aggregate.total),
            by_company: aggregate
                .by_company
                .into_iter()
                .map(|(code, value)| (code, ReportValue::new(spec.kind, value)))
                .collect(),
            excluded_total,
            excluded_codes,
        }
    }
}
