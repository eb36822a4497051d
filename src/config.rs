// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module is the single place where environment variables are read,
//! defaults are applied and values are validated. Every component is built
//! from the immutable [`AppConfig`] it produces, never from the environment
//! directly. Failures are treated as deployment errors rather than
//! recoverable runtime conditions.

use crate::domain::{LogLevel, ServiceIdentity};
use anyhow::Result;
use reqwest::Url;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads an optional environment variable as a string.
///
/// Unset and blank values are both treated as "not provided".
macro_rules! optional_env {
    // ---
    ($key:literal) => {
        std::env::var($key).ok().filter(|v| !v.trim().is_empty())
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.trim().parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional environment variable that must parse when present.
///
/// Missing values yield `None`. A value that is present but malformed is
/// a configuration error naming the variable.
macro_rules! optional_env_strict {
    // ---
    ($key:literal, $ty:ty) => {
        match optional_env!($key) {
            Some(v) => Some(v.trim().parse::<$ty>().map_err(|e| {
                anyhow::anyhow!(concat!("Invalid configuration: ", $key, "={:?} ({})"), v, e)
            })?),
            None => None,
        }
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails because of a malformed
/// environment variable.
macro_rules! assert_invalid_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Invalid configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service: ServiceIdentity,
    pub database: database::DatabaseConfig,
    pub logging: logging::LoggingConfig,
    pub metrics: metrics::MetricsConfig,
    pub server: server::ServerConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any value is present but invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            service: ServiceIdentity::evaluation_coordinator(),
            database: database::DatabaseConfig::from_env()?,
            logging: logging::LoggingConfig::from_env()?,
            metrics: metrics::MetricsConfig::from_env()?,
            server: server::ServerConfig::from_env(),
        })
    }
}

// ============================================================
// Database configuration
// ============================================================

mod database {
    // ---
    use super::*;
    use std::fmt;

    /// Postgres connection and pool configuration.
    ///
    /// Connection fields left as `None` are resolved by the driver from its
    /// own defaults. Fields that are `Some` override them.
    #[derive(Clone)]
    pub struct DatabaseConfig {
        /// `PGHOST`
        pub host: Option<String>,

        /// `PGPORT`. Must be a valid port number when set.
        pub port: Option<u16>,

        /// `PGDATABASE`
        pub database: Option<String>,

        /// `PGUSER`
        pub user: Option<String>,

        /// `PGPASSWORD`
        pub password: Option<String>,

        /// Number of connection attempts made by the startup sequence. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections to be open concurrently. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `PGPORT` is set but is not a port number.
        pub fn from_env() -> Result<Self> {
            // ---
            let port = optional_env_strict!("PGPORT", u16);
            let retry_count = optional_env_parse!("EVAL_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("EVAL_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("EVAL_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("EVAL_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                host: optional_env!("PGHOST"),
                port,
                database: optional_env!("PGDATABASE"),
                user: optional_env!("PGUSER"),
                password: optional_env!("PGPASSWORD"),
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }

    impl fmt::Debug for DatabaseConfig {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            // ---
            f.debug_struct("DatabaseConfig")
                .field("host", &self.host)
                .field("port", &self.port)
                .field("database", &self.database)
                .field("user", &self.user)
                .field("password", &self.password.as_ref().map(|_| "********"))
                .field("retry_count", &self.retry_count)
                .field("acquire_timeout", &self.acquire_timeout)
                .field("min_connections", &self.min_connections)
                .field("max_connections", &self.max_connections)
                .finish()
        }
    }
}
pub use database::DatabaseConfig;

// ============================================================
// Logging configuration
// ============================================================

mod logging {
    // ---
    use super::*;
    use std::str::FromStr;

    /// Output encoding of log records.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub enum LogFormat {
        #[default]
        Text,
        Json,
    }

    impl FromStr for LogFormat {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> Result<Self> {
            // ---
            match s.trim().to_ascii_lowercase().as_str() {
                "text" | "pretty" => Ok(LogFormat::Text),
                "json" => Ok(LogFormat::Json),
                other => Err(anyhow::anyhow!("Unknown log format: {other}")),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Minimum emitted severity. Read once from `LOG_LEVEL`, defaults to `info`.
        pub level: LogLevel,

        /// `LOG_FORMAT`, defaults to text.
        pub format: LogFormat,
    }

    impl LoggingConfig {
        /// Builds a [`LoggingConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `LOG_LEVEL` or `LOG_FORMAT` is not recognized.
        pub fn from_env() -> Result<Self> {
            // ---
            let level = optional_env_strict!("LOG_LEVEL", LogLevel).unwrap_or_default();
            let format = optional_env_strict!("LOG_FORMAT", LogFormat).unwrap_or_default();

            Ok(Self { level, format })
        }
    }
}
pub use logging::{LogFormat, LoggingConfig};

// ============================================================
// Metrics configuration
// ============================================================

mod metrics {
    // ---
    use super::*;
    use std::str::FromStr;

    /// Push endpoint used when `ALLOY_URL` is not set.
    pub const DEFAULT_ALLOY_URL: &str = "http://localhost:9091/api/v1/write";

    /// Which metrics implementation the service records into.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub enum MetricsBackend {
        #[default]
        Prometheus,
        Noop,
    }

    impl FromStr for MetricsBackend {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> Result<Self> {
            // ---
            match s.trim().to_ascii_lowercase().as_str() {
                "prometheus" | "prom" => Ok(MetricsBackend::Prometheus),
                "noop" => Ok(MetricsBackend::Noop),
                other => Err(anyhow::anyhow!("Unknown metrics backend: {other}")),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct MetricsConfig {
        /// `METRICS_BACKEND`, defaults to prometheus.
        pub backend: MetricsBackend,

        /// Push endpoint (`ALLOY_URL`). Always an absolute http(s) URL.
        pub alloy_url: Url,

        /// Delay between two pushes. Defaults to 15 seconds.
        pub push_interval: Duration,
    }

    impl MetricsConfig {
        /// Builds a [`MetricsConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `ALLOY_URL` is not an absolute http(s) URL, or
        /// `METRICS_BACKEND` is not recognized.
        pub fn from_env() -> Result<Self> {
            // ---
            let backend =
                optional_env_strict!("METRICS_BACKEND", MetricsBackend).unwrap_or_default();
            let alloy_url = match optional_env_strict!("ALLOY_URL", Url) {
                Some(url) => url,
                None => Url::parse(DEFAULT_ALLOY_URL)?,
            };
            anyhow::ensure!(
                matches!(alloy_url.scheme(), "http" | "https"),
                "Invalid configuration: ALLOY_URL must use http or https, got {alloy_url}"
            );
            let interval_secs = optional_env_parse!("METRICS_PUSH_INTERVAL_SEC", u64, 15).max(1);

            Ok(Self {
                backend,
                alloy_url,
                push_interval: Duration::from_secs(interval_secs),
            })
        }
    }
}
pub use metrics::{MetricsBackend, MetricsConfig, DEFAULT_ALLOY_URL};

// ============================================================
// HTTP server configuration
// ============================================================

mod server {
    // ---

    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// `API_BIND_ADDR`, defaults to `127.0.0.1:8080`.
        pub bind_addr: String,
    }

    impl ServerConfig {
        pub fn from_env() -> Self {
            // ---
            Self {
                bind_addr: optional_env!("API_BIND_ADDR")
                    .unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            }
        }
    }
}
pub use server::ServerConfig;

// ============================================================
// Tests
// ============================================================
