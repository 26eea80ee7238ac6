//! ERP company directory.

use serde::Serialize;

use painel_shared::CompanyCode;

use super::query::build_company_query;
use super::source::{ErpError, ErpSource};

/// One row of `bethadba.geempre`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    /// ERP company code.
    pub codi_emp: CompanyCode,
    /// Company name.
    pub nome_emp: String,
    /// Corporate tax id as stored in the ERP.
    pub cgce_emp: Option<String>,
}

/// Lists companies, restricted to `codes` when given.
///
/// Rows without a readable company code are skipped.
///
/// # Errors
///
/// Returns the source's `ErpError` unchanged.
pub async fn list_companies(
    source: &dyn ErpSource,
    codes: Option<&[CompanyCode]>,
) -> Result<Vec<Company>, ErpError> {
    let rows = source.query(&build_company_query(codes)).await?;

    Ok(rows
        .iter()
        .filter_map(|row| {
            Some(Company {
                codi_emp: row.code("codi_emp")?,
                nome_emp: row.text("nome_emp").unwrap_or_default().trim().to_string(),
                cgce_emp: row.text("cgce_emp").map(|s| s.trim().to_string()),
            })
        })
        .collect())
}
