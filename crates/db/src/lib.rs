//! Data access for Painel.
//!
//! This crate provides:
//! - `SeaORM` entity and migrations for the account store
//! - The account repository
//! - The ODBC connection pool and the [`painel_core::reports::ErpSource`]
//!   implementation backed by it

pub mod entities;
pub mod erp;
pub mod migration;
pub mod repositories;

pub use erp::{OdbcErpSource, OdbcManager, Pool, PoolError};
pub use repositories::{CreateUserInput, UpdateUserInput, UserError, UserFilter, UserRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the account store.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection with explicit pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
