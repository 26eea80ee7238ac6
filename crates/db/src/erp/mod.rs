//! ERP access over ODBC.

mod odbc;
mod pool;

pub use odbc::{OdbcErpSource, OdbcManager};
pub use pool::{ConnectionManager, Pool, PoolError, PooledConnection};
