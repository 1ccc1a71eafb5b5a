use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URLs of the three services.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub category_url: String,
    pub product_url: String,
    pub review_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(
        category_url: impl Into<String>,
        product_url: impl Into<String>,
        review_url: impl Into<String>,
    ) -> Self {
        Self {
            category_url: category_url.into(),
            product_url: product_url.into(),
            review_url: review_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Every service behind one base URL, as served by the `shop` binary.
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self::new(base_url.clone(), base_url.clone(), base_url)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(
            "http://localhost:3000",
            "http://localhost:8000",
            "http://localhost:5000",
        )
    }
}
