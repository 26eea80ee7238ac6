//! The ERP data source seam.
//!
//! The core never talks to ODBC directly: it hands an [`ErpQuery`] to an
//! [`ErpSource`] and gets back plain column→text rows.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

/// A parameterized ERP query. Every `?` placeholder has one entry in `params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpQuery {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// Bound integer parameters, in placeholder order.
    pub params: Vec<i32>,
}

impl ErpQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<i32>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// One result row: lower-cased column name to text value (`None` for NULL).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErpRow(HashMap<String, Option<String>>);

impl ErpRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value. Column names are stored lower-cased.
    pub fn insert(&mut self, column: &str, value: Option<String>) {
        self.0.insert(column.to_ascii_lowercase(), value);
    }

    /// Builder-style [`ErpRow::insert`].
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<Option<String>>) -> Self {
        self.insert(column, value.into());
        self
    }

    /// Returns the raw text of a column, `None` if missing or NULL.
    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        self.0
            .get(&column.to_ascii_lowercase())
            .and_then(Option::as_deref)
    }

    /// Parses a column as an integer code.
    #[must_use]
    pub fn code(&self, column: &str) -> Option<i32> {
        let raw = self.text(column)?.trim();
        raw.parse::<i32>().ok().or_else(|| {
            // Some drivers render integer columns as `101.0`.
            Decimal::from_str(raw)
                .ok()
                .filter(|d| d.fract().is_zero())
                .and_then(|d| i32::try_from(d).ok())
        })
    }

    /// Reads a column as a number; NULL, missing or unparseable values are zero.
    #[must_use]
    pub fn number(&self, column: &str) -> Decimal {
        self.text(column).map_or(Decimal::ZERO, coerce_decimal)
    }
}

/// Coerces driver text to a decimal, treating anything unparseable as zero.
#[must_use]
pub fn coerce_decimal(raw: &str) -> Decimal {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}

/// Errors raised by an ERP data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErpError {
    /// The driver rejected or failed the query.
    #[error("ERP query failed: {0}")]
    Query(String),

    /// The query exceeded its time budget.
    #[error("ERP query timed out after {0:?}")]
    Timeout(Duration),

    /// No connection could be obtained.
    #[error("ERP connection unavailable: {0}")]
    ConnectionUnavailable(String),
}

/// A read-only ERP data source.
#[async_trait]
pub trait ErpSource: Send + Sync {
    /// Runs a query and returns every row.
    async fn query(&self, query: &ErpQuery) -> Result<Vec<ErpRow>, ErpError>;

    /// Checks that the source is reachable.
    async fn ping(&self) -> Result<(), ErpError> {
        self.query(&ErpQuery::new("SELECT 1", Vec::new()))
            .await
            .map(|_| ())
    }
}
