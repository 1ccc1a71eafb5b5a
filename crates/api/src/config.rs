//! Service configuration loaded from environment variables.

use std::time::Duration;

use validator::ValidatorConfig;

pub const CATEGORY_SERVICE_PORT: u16 = 3000;
pub const PRODUCT_SERVICE_PORT: u16 = 8000;
pub const REVIEW_SERVICE_PORT: u16 = 5000;
pub const SHOP_PORT: u16 = 8080;

const DEFAULT_CATEGORY_SERVICE_URL: &str = "http://category-service:3000";

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` bind address (default: `"0.0.0.0"`)
/// - `PORT` listen port (default depends on the binary)
/// - `RUST_LOG` tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` `json` for structured output, anything else for human output
/// - `DATABASE_URL` PostgreSQL connection string; in-memory stores when unset
/// - `DATABASE_MAX_CONNECTIONS` pool size (default: `5`)
/// - `CATEGORY_SERVICE_URL` base URL of the category service
/// - `PRODUCT_SERVICE_URL` base URL of the product service; reviews are not
///   validated when unset
/// - `DEPENDENCY_CONNECT_TIMEOUT_MS`, `DEPENDENCY_TIMEOUT_MS`,
///   `HEALTH_PROBE_TIMEOUT_MS` dependency call timeouts
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub category_service_url: String,
    pub product_service_url: Option<String>,
    pub dependency_connect_timeout: Duration,
    pub dependency_timeout: Duration,
    pub health_probe_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env(default_port: u16) -> Self {
        Self::from_lookup(default_port, |key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup(default_port: u16, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::with_port(default_port);
        let millis = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            category_service_url: lookup("CATEGORY_SERVICE_URL")
                .unwrap_or(defaults.category_service_url),
            product_service_url: lookup("PRODUCT_SERVICE_URL").filter(|url| !url.trim().is_empty()),
            dependency_connect_timeout: millis(
                "DEPENDENCY_CONNECT_TIMEOUT_MS",
                defaults.dependency_connect_timeout,
            ),
            dependency_timeout: millis("DEPENDENCY_TIMEOUT_MS", defaults.dependency_timeout),
            health_probe_timeout: millis("HEALTH_PROBE_TIMEOUT_MS", defaults.health_probe_timeout),
        }
    }

    /// Defaults for a binary listening on `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validator settings for the category dependency.
    pub fn category_validator(&self) -> ValidatorConfig {
        self.with_dependency_timeouts(ValidatorConfig::categories(&self.category_service_url))
    }

    /// Validator settings for the product dependency, if one is configured.
    pub fn product_validator(&self) -> Option<ValidatorConfig> {
        self.product_service_url
            .as_deref()
            .map(|url| self.with_dependency_timeouts(ValidatorConfig::products(url)))
    }

    fn with_dependency_timeouts(&self, config: ValidatorConfig) -> ValidatorConfig {
        config
            .with_timeouts(self.dependency_connect_timeout, self.dependency_timeout)
            .with_probe_timeout(self.health_probe_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: CATEGORY_SERVICE_PORT,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            database_url: None,
            database_max_connections: 5,
            category_service_url: DEFAULT_CATEGORY_SERVICE_URL.to_string(),
            product_service_url: None,
            dependency_connect_timeout: validator::config::DEFAULT_CONNECT_TIMEOUT,
            dependency_timeout: validator::config::DEFAULT_TIMEOUT,
            health_probe_timeout: validator::config::DEFAULT_PROBE_TIMEOUT,
        }
    }
}
