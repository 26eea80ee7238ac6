//! Report query construction.
//!
//! One query per metric per request: company codes go into a bound
//! `codi_emp IN (...)` list, scalar filters are bound too, and the period is
//! spliced in as an OR of validated date ranges.

use painel_shared::CompanyCode;

use super::metric::{COMPANY_COLUMN, Filter, MetricSpec, NATURE_COLUMN};
use super::source::ErpQuery;
use crate::period::ReportPeriod;

/// Alias of the aggregated value column in every report query.
pub const TOTAL_ALIAS: &str = "total";

/// Returns `?, ?, ?` for `n` placeholders.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Builds the aggregation query for a metric.
///
/// Rows come back grouped by company and, for metrics that use the nature
/// exclusion set, by nature code as well.
#[must_use]
pub fn build_report_query(
    spec: &MetricSpec,
    codes: &[CompanyCode],
    period: &ReportPeriod,
) -> ErpQuery {
    let mut params: Vec<i32> = codes.to_vec();

    let mut group_by = vec![COMPANY_COLUMN];
    if spec.uses_exclusions {
        group_by.push(NATURE_COLUMN);
    }
    let group_columns = group_by.join(", ");

    let mut predicates = vec![
        format!("{COMPANY_COLUMN} IN ({})", placeholders(codes.len())),
        period.sql_predicate(spec.date_column),
    ];
    for filter in spec.filters {
        match *filter {
            Filter::Eq(column, value) => {
                predicates.push(format!("{column} = ?"));
                params.push(value);
            }
            Filter::In(column, values) => {
                predicates.push(format!("{column} IN ({})", placeholders(values.len())));
                params.extend_from_slice(values);
            }
            Filter::NotIn(column, values) => {
                predicates.push(format!("{column} NOT IN ({})", placeholders(values.len())));
                params.extend_from_slice(values);
            }
        }
    }

    let sql = format!(
        "SELECT {group_columns}, {value} AS {TOTAL_ALIAS} FROM {table} WHERE {where_clause} GROUP BY {group_columns}",
        value = spec.value.to_sql(),
        table = spec.qualified_table(),
        where_clause = predicates.join(" AND "),
    );

    ErpQuery::new(sql, params)
}

/// Builds the company directory lookup over `bethadba.geempre`.
///
/// `None` lists every company (administrators without a filter).
#[must_use]
pub fn build_company_query(codes: Option<&[CompanyCode]>) -> ErpQuery {
    let base = "SELECT codi_emp, nome_emp, cgce_emp FROM bethadba.geempre";
    match codes {
        Some(codes) => ErpQuery::new(
            format!(
                "{base} WHERE codi_emp IN ({}) ORDER BY codi_emp",
                placeholders(codes.len())
            ),
            codes.to_vec(),
        ),
        None => ErpQuery::new(format!("{base} ORDER BY codi_emp"), Vec::new()),
    }
}
