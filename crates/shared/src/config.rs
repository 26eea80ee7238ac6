//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Account store configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// ERP (ODBC) configuration.
    pub erp: ErpConfig,
    /// Report configuration.
    #[serde(default)]
    pub reports: ReportsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3003
}

/// Account store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Session token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// ERP connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ErpConfig {
    /// ODBC connection string (`DRIVER=...;SERVER=...;UID=...;PWD=...`).
    pub connection_string: String,
    /// Upper bound on simultaneously open ODBC connections.
    #[serde(default = "default_erp_max_connections")]
    pub max_connections: usize,
    /// How long a request waits for a free connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// Per-query timeout, enforced by the driver and by the runtime.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_erp_max_connections() -> usize {
    8
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_query_timeout() -> u64 {
    30
}

/// Report configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportsConfig {
    /// Transaction-nature codes excluded from entries/exits totals.
    #[serde(default)]
    pub excluded_natures: Vec<i32>,
    /// Inclusive `[from, to]` ranges of excluded nature codes.
    #[serde(default)]
    pub excluded_nature_ranges: Vec<[i32; 2]>,
}

impl ReportsConfig {
    /// Expands single codes and ranges into one list of excluded codes.
    #[must_use]
    pub fn excluded_codes(&self) -> Vec<i32> {
        let mut codes = self.excluded_natures.clone();
        for [from, to] in &self.excluded_nature_ranges {
            codes.extend(*from..=*to);
        }
        codes
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/excluded_natures").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PAINEL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_codes_expands_ranges() {
        let reports = ReportsConfig {
            excluded_natures: vec![5929, 6929],
            excluded_nature_ranges: vec![[1901, 1903]],
        };

        assert_eq!(reports.excluded_codes(), vec![5929, 6929, 1901, 1902, 1903]);
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("PAINEL__DATABASE__URL", Some("postgres://localhost/painel")),
                ("PAINEL__JWT__SECRET", Some("env-secret")),
                ("PAINEL__ERP__CONNECTION_STRING", Some("DSN=contabil")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/painel");
                assert_eq!(config.jwt.secret, "env-secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 3600);
                assert_eq!(config.erp.connection_string, "DSN=contabil");
                assert_eq!(config.erp.max_connections, 8);
                assert_eq!(config.server.port, 3003);
            },
        );
    }
}
