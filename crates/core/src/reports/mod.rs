//! Metric reports over the ERP.
//!
//! - `metric` - declarative catalog of the 17 report metrics
//! - `query` - parameterized query construction
//! - `source` - the ERP data source trait and row type
//! - `aggregate` - totals, per-company breakdown and exclusion partition
//! - `company` - the ERP company directory

pub mod aggregate;
pub mod company;
pub mod error;
pub mod exclusion;
pub mod metric;
pub mod query;
pub mod service;
pub mod source;
pub mod types;


pub use aggregate::Aggregate;
pub use company::{Company, list_companies};
pub use error::ReportError;
pub use exclusion::ExclusionSet;
pub use metric::{Metric, MetricKind};
pub use service::ReportService;
pub use source::{ErpError, ErpQuery, ErpRow, ErpSource};
pub use types::{ReportResult, ReportValue};
