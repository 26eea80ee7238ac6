//! Painel API Server
//!
//! Main entry point for the dashboard backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use painel_api::{AppState, create_router};
use painel_core::reports::ExclusionSet;
use painel_db::{OdbcErpSource, connect_with};
use painel_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "painel=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("failed to connect to the account store")?;
    info!("Connected to account store");

    // ERP connections open lazily on first use.
    let erp = OdbcErpSource::from_config(&config.erp);
    info!(
        max_connections = erp.pool().max_size(),
        query_timeout_secs = config.erp.query_timeout_secs,
        "ERP source configured"
    );

    let exclusions = ExclusionSet::from_codes(config.reports.excluded_codes());
    if exclusions.is_empty() {
        warn!("No excluded transaction natures configured");
    } else {
        info!(codes = exclusions.len(), "Loaded excluded transaction natures");
    }

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        erp: Arc::new(erp),
        exclusions: Arc::new(exclusions),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
