//! Result aggregation.
//!
//! Rows come back already grouped by the ERP (per company, and per nature code
//! for the entries/exits metrics); this module folds them into a grand total,
//! a per-company breakdown and, when the metric uses the exclusion set, an
//! excluded bucket.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::{Decimal, RoundingStrategy};

use painel_shared::CompanyCode;

use super::exclusion::ExclusionSet;
use super::metric::{COMPANY_COLUMN, MetricSpec, NATURE_COLUMN};
use super::query::TOTAL_ALIAS;
use super::source::ErpRow;

/// Unrounded aggregation of one metric over a set of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Primary total (excluded rows left out).
    pub total: Decimal,
    /// Sum of the rows whose nature code is in the exclusion set.
    pub excluded_total: Decimal,
    /// Distinct excluded nature codes actually seen, sorted.
    pub excluded_codes: BTreeSet<i32>,
    /// Primary total per company code.
    pub by_company: BTreeMap<CompanyCode, Decimal>,
}

impl Aggregate {
    /// An empty aggregate with a zero entry for each company, so companies
    /// without rows still show up in the breakdown.
    #[must_use]
    pub fn for_companies(codes: &[CompanyCode]) -> Self {
        Self {
            by_company: codes.iter().map(|&code| (code, Decimal::ZERO)).collect(),
            ..Self::default()
        }
    }

    fn add_included(&mut self, row: &ErpRow) {
        let value = row.number(TOTAL_ALIAS);
        self.total += value;
        if let Some(company) = row.code(COMPANY_COLUMN) {
            *self.by_company.entry(company).or_insert(Decimal::ZERO) += value;
        }
    }

    fn add_excluded(&mut self, row: &ErpRow) {
        self.excluded_total += row.number(TOTAL_ALIAS);
        if let Some(nature) = row.code(NATURE_COLUMN) {
            self.excluded_codes.insert(nature);
        }
    }
}

/// Aggregates `rows` for a metric over `companies`.
///
/// Metrics that use the exclusion set are split with [`partition`] first;
/// every other metric sums all rows.
#[must_use]
pub fn aggregate(
    companies: &[CompanyCode],
    rows: &[ErpRow],
    spec: &MetricSpec,
    exclusions: &ExclusionSet,
) -> Aggregate {
    let mut result = Aggregate::for_companies(companies);
    if !spec.uses_exclusions {
        for row in rows {
            result.add_included(row);
        }
        return result;
    }

    let (included, excluded) = partition(rows, exclusions);
    for row in included {
        result.add_included(row);
    }
    for row in excluded {
        result.add_excluded(row);
    }
    result
}

/// Splits rows into `(included, excluded)` by nature code.
///
/// Rows without a readable nature code are included.
#[must_use]
pub fn partition<'a>(
    rows: &'a [ErpRow],
    exclusions: &ExclusionSet,
) -> (Vec<&'a ErpRow>, Vec<&'a ErpRow>) {
    rows.iter().partition(|row| {
        !row
            .code(NATURE_COLUMN)
            .is_some_and(|nature| exclusions.contains(nature))
    })
}

/// Rounds a monetary amount to 2 places, midpoint away from zero.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
