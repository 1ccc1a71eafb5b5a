//! Validator configuration.

use std::time::Duration;

/// Default connect timeout for validation calls.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
/// Default total timeout for validation calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default total timeout for health probes.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Where and how to reach the service that owns the referenced entities.
///
/// Entities are looked up at `{base_url}{resource_path}/{id}`; the liveness
/// probe is `{base_url}/health`.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Name used in logs, metrics and health output, e.g. `category_service`.
    pub dependency: String,
    /// What an ID refers to, e.g. `category`.
    pub resource: String,
    pub base_url: String,
    pub resource_path: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub probe_timeout: Duration,
}

impl ValidatorConfig {
    /// Validation against the category service's `/api/categories/{id}`.
    pub fn categories(base_url: impl Into<String>) -> Self {
        Self::new("category_service", "category", base_url, "/api/categories")
    }

    /// Validation against the product service's `/api/products/{id}`.
    pub fn products(base_url: impl Into<String>) -> Self {
        Self::new("product_service", "product", base_url, "/api/products")
    }

    pub fn new(
        dependency: impl Into<String>,
        resource: impl Into<String>,
        base_url: impl Into<String>,
        resource_path: impl Into<String>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            resource: resource.into(),
            base_url: base_url.into(),
            resource_path: resource_path.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_defaults() {
        let config = ValidatorConfig::categories("http://category-service:3000");
        assert_eq!(config.dependency, "category_service");
        assert_eq!(config.resource, "category");
        assert_eq!(config.resource_path, "/api/categories");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
    }

    #[test]
    fn timeouts_can_be_overridden() {
        let config = ValidatorConfig::products("http://localhost:8000")
            .with_timeouts(Duration::from_millis(100), Duration::from_millis(200))
            .with_probe_timeout(Duration::from_millis(50));
        assert_eq!(config.connect_timeout, Duration::from_millis(100));
        assert_eq!(config.timeout, Duration::from_millis(200));
        assert_eq!(config.probe_timeout, Duration::from_millis(50));
    }
}
