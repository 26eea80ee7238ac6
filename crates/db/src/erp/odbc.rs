//! ODBC-backed ERP source.

use std::time::Duration;

use async_trait::async_trait;
use odbc_api::{
    Connection, ConnectionOptions, Cursor, Environment, IntoParameter, ResultSetMetadata,
    parameter::InputParameter,
};
use once_cell::sync::Lazy;
use tracing::{debug, error};

use painel_core::reports::{ErpError, ErpQuery, ErpRow, ErpSource};
use painel_shared::config::ErpConfig;

use super::pool::{ConnectionManager, Pool, PoolError};

/// Process-wide ODBC environment.
static ENVIRONMENT: Lazy<Result<Environment, String>> =
    Lazy::new(|| Environment::new().map_err(|e| e.to_string()));

/// SQLSTATE reported by drivers when a statement exceeds its query timeout.
const TIMEOUT_SQLSTATE: &str = "HYT00";

/// Extra time the async side waits beyond the driver timeout before giving up
/// on a blocking query task.
const TASK_GRACE: Duration = Duration::from_secs(2);

/// Opens ODBC connections from a connection string.
#[derive(Debug, Clone)]
pub struct OdbcManager {
    connection_string: String,
    login_timeout: Duration,
}

impl OdbcManager {
    /// Creates a manager.
    #[must_use]
    pub fn new(connection_string: impl Into<String>, login_timeout: Duration) -> Self {
        Self {
            connection_string: connection_string.into(),
            login_timeout,
        }
    }
}

impl ConnectionManager for OdbcManager {
    type Connection = Connection<'static>;
    type Error = String;

    fn connect(&self) -> Result<Connection<'static>, String> {
        let env = ENVIRONMENT.as_ref().map_err(Clone::clone)?;
        let options = ConnectionOptions {
            login_timeout_sec: u32::try_from(self.login_timeout.as_secs()).ok(),
            ..ConnectionOptions::default()
        };
        env.connect_with_connection_string(&self.connection_string, options)
            .map_err(|e| e.to_string())
    }
}

impl From<PoolError> for ErpError {
    fn from(err: PoolError) -> Self {
        Self::ConnectionUnavailable(err.to_string())
    }
}

/// The production [`ErpSource`]: pooled ODBC connections, blocking calls on
/// the blocking thread pool, bounded by the configured query timeout.
#[derive(Clone)]
pub struct OdbcErpSource {
    pool: Pool<OdbcManager>,
    query_timeout: Duration,
}

impl OdbcErpSource {
    /// Builds the source from configuration. No connection is opened yet.
    #[must_use]
    pub fn from_config(config: &ErpConfig) -> Self {
        let manager = OdbcManager::new(
            config.connection_string.clone(),
            Duration::from_secs(config.acquire_timeout_secs),
        );
        Self {
            pool: Pool::new(
                manager,
                config.max_connections,
                Duration::from_secs(config.acquire_timeout_secs),
            ),
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        }
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &Pool<OdbcManager> {
        &self.pool
    }
}

#[async_trait]
impl ErpSource for OdbcErpSource {
    async fn query(&self, query: &ErpQuery) -> Result<Vec<ErpRow>, ErpError> {
        let mut conn = self.pool.acquire().await?;
        let sql = query.sql.clone();
        let params = query.params.clone();
        let timeout = self.query_timeout;

        let task = tokio::task::spawn_blocking(move || {
            let result = run_query(&conn, &sql, &params, timeout);
            if result.is_err() {
                conn.mark_broken();
            }
            result
        });

        match tokio::time::timeout(timeout + TASK_GRACE, task).await {
            Err(_) => {
                error!(timeout_secs = timeout.as_secs(), "ERP query task timed out");
                Err(ErpError::Timeout(timeout))
            }
            Ok(Err(join)) => Err(ErpError::Query(format!("query task failed: {join}"))),
            Ok(Ok(rows)) => rows,
        }
    }
}

/// Executes one statement and reads every row as text.
fn run_query(
    conn: &Connection<'static>,
    sql: &str,
    params: &[i32],
    timeout: Duration,
) -> Result<Vec<ErpRow>, ErpError> {
    let bound: Vec<Box<dyn InputParameter>> = params
        .iter()
        .map(|&p| Box::new(p.into_parameter()) as Box<dyn InputParameter>)
        .collect();
    let timeout_sec = usize::try_from(timeout.as_secs()).ok();

    let cursor = conn
        .execute(sql, bound.as_slice(), timeout_sec)
        .map_err(|e| driver_error(&e, timeout))?;
    let Some(mut cursor) = cursor else {
        return Ok(Vec::new());
    };

    let columns: Vec<String> = cursor
        .column_names()
        .map_err(|e| driver_error(&e, timeout))?
        .collect::<Result<_, _>>()
        .map_err(|e| driver_error(&e, timeout))?;

    let mut rows = Vec::new();
    let mut buf = Vec::new();
    while let Some(mut row) = cursor.next_row().map_err(|e| driver_error(&e, timeout))? {
        let mut erp_row = ErpRow::new();
        for (index, name) in columns.iter().enumerate() {
            let column = u16::try_from(index + 1)
                .map_err(|_| ErpError::Query("too many columns".to_string()))?;
            buf.clear();
            let present = row
                .get_text(column, &mut buf)
                .map_err(|e| driver_error(&e, timeout))?;
            let value = present.then(|| String::from_utf8_lossy(&buf).into_owned());
            erp_row.insert(name, value);
        }
        rows.push(erp_row);
    }

    debug!(rows = rows.len(), "ERP query returned");
    Ok(rows)
}

fn driver_error(err: &odbc_api::Error, timeout: Duration) -> ErpError {
    let message = err.to_string();
    if message.contains(TIMEOUT_SQLSTATE) {
        return ErpError::Timeout(timeout);
    }
    error!(error = %message, "ERP driver error");
    ErpError::Query(message)
}
