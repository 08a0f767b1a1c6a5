//! Application configuration module
//!
//! Provides the service configuration, its builder, and loading from the
//! process environment.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

/// Default SQLite database location (created on first start)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://rollbook.db?mode=rwc";

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default size of the connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// sqlx connection URL for the SQLite database
    pub database_url: String,
    /// Interface the HTTP listener binds to
    pub host: String,
    /// Port the HTTP listener binds to
    pub port: u16,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Single allowed CORS origin; `None` allows any origin
    pub cors_allowed_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            cors_allowed_origin: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// Reads `DATABASE_URL`, `SERVER_HOST`, `SERVER_PORT`,
    /// `DATABASE_MAX_CONNECTIONS` and `CORS_ALLOWED_ORIGIN`. Unset variables
    /// fall back to defaults; set-but-invalid values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(url) = read_var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(host) = read_var("SERVER_HOST") {
            builder = builder.host(host);
        }
        if let Some(port) = read_var("SERVER_PORT") {
            let port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port))?;
            builder = builder.port(port);
        }
        if let Some(max) = read_var("DATABASE_MAX_CONNECTIONS") {
            let max = max
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS", max))?;
            builder = builder.max_connections(max);
        }
        if let Some(origin) = read_var("CORS_ALLOWED_ORIGIN") {
            builder = builder.cors_allowed_origin(origin);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidUrl(self.database_url.clone()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS",
                self.max_connections.to_string(),
            ));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SERVER_HOST", self.host.clone()))
    }
}

fn read_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            tracing::debug!("{key} not set, using default");
            None
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    max_connections: Option<u32>,
    cors_allowed_origin: Option<String>,
}

impl AppConfigBuilder {
    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the bind port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the pool size
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Restrict CORS to one origin
    pub fn cors_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_allowed_origin = Some(origin.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_url: self.database_url.unwrap_or(defaults.database_url),
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            cors_allowed_origin: self.cors_allowed_origin,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid database URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AppConfig::builder().build().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::builder()
            .database_url("sqlite::memory:")
            .host("127.0.0.1")
            .port(8080)
            .max_connections(1)
            .cors_allowed_origin("http://localhost:5173")
            .build()
            .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.max_connections, 1);
        assert_eq!(
            config.cors_allowed_origin.as_deref(),
            Some("http://localhost:5173")
        );
    }

    #[test]
    fn test_rejects_non_sqlite_url() {
        let err = AppConfig::builder()
            .database_url("postgres://localhost/school")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_rejects_zero_connections() {
        let err = AppConfig::builder().max_connections(0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS", _)
        ));
    }

    #[test]
    fn test_rejects_bad_host() {
        let err = AppConfig::builder().host("not a host").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("SERVER_HOST", _)));
    }
}
