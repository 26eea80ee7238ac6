//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes (login, account management, company directory, reports)
//! - Session token middleware
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use painel_core::reports::{ErpSource, ExclusionSet};
use painel_shared::JwtService;

pub use error::ApiError;

/// Application state shared across handlers. Immutable after start-up.
#[derive(Clone)]
pub struct AppState {
    /// Account store connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// ERP data source.
    pub erp: Arc<dyn ErpSource>,
    /// Nature codes left out of entries/exits totals.
    pub exclusions: Arc<ExclusionSet>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
