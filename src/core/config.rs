use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | DATA_DIR | /var/lib/dayflow | Data directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | COMPANY_CODE | DF | Company code used for the bootstrap admin |
/// | ADMIN_EMAIL | admin@dayflow.local | Bootstrap admin login email |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout (ms) |
/// | JWT_SECRET | - | Token signing key (>= 32 chars, required in production) |
/// | JWT_EXPIRATION_MINUTES | 480 | Token lifetime |
/// | JWT_ISSUER / JWT_AUDIENCE | dayflow-server / dayflow-web | Token claims |
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory holding the embedded database
    pub data_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Company code for the bootstrap admin account
    pub company_code: String,
    /// Bootstrap admin login email
    pub admin_email: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/dayflow".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            company_code: std::env::var("COMPANY_CODE").unwrap_or_else(|_| "DF".into()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@dayflow.local".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Override data dir and port, usually for tests
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory holding the embedded database files
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("database")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
