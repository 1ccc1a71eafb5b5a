//! Validation over HTTP against the owning service's REST API.

use std::time::Instant;

use async_trait::async_trait;
use common::ComponentStatus;
use reqwest::{Client, StatusCode, Url};

use crate::{
    DependencyValidator, Reachability, ValidationOutcome, ValidatorConfig, ValidatorError,
};

/// Validator that issues `GET {base_url}{resource_path}/{id}`.
///
/// The client carries the configured connect and total timeouts, so a slow or
/// dead dependency holds the calling request for at most `timeout`.
#[derive(Debug, Clone)]
pub struct HttpDependencyValidator {
    config: ValidatorConfig,
    base_url: Url,
    http: Client,
    reachability: Reachability,
}

impl HttpDependencyValidator {
    /// Builds the validator and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or the
    /// client cannot be built.
    pub fn new(config: ValidatorConfig) -> Result<Self, ValidatorError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ValidatorError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ValidatorError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "expected an absolute http(s) URL".to_string(),
            });
        }

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            base_url,
            http,
            reachability: Reachability::new(),
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// URL of a single entity. The ID is percent-encoded as one path segment.
    pub fn resource_url(&self, id: &str) -> Url {
        self.url_with_segments(
            self.config
                .resource_path
                .split('/')
                .filter(|s| !s.is_empty())
                .chain(std::iter::once(id)),
        )
    }

    pub fn health_url(&self) -> Url {
        self.url_with_segments(std::iter::once("health"))
    }

    fn url_with_segments<'a>(&self, segments: impl Iterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can always carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn classify(&self, status: StatusCode) -> ValidationOutcome {
        if status.is_success() {
            ValidationOutcome::Valid
        } else if status == StatusCode::NOT_FOUND {
            ValidationOutcome::NotFound
        } else {
            ValidationOutcome::Unreachable(format!(
                "{} responded with unexpected status {status}",
                self.config.dependency
            ))
        }
    }

    fn describe_transport_error(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!(
                "timed out contacting {} after {:?}",
                self.config.dependency, self.config.timeout
            )
        } else if err.is_connect() {
            format!("error connecting to {}: {err}", self.config.dependency)
        } else {
            format!("error calling {}: {err}", self.config.dependency)
        }
    }
}

#[async_trait]
impl DependencyValidator for HttpDependencyValidator {
    fn dependency(&self) -> &str {
        &self.config.dependency
    }

    fn resource(&self) -> &str {
        &self.config.resource
    }

    #[tracing::instrument(skip(self), fields(dependency = %self.config.dependency))]
    async fn validate(&self, id: &str) -> ValidationOutcome {
        let started = Instant::now();
        let url = self.resource_url(id);

        let outcome = match self.http.get(url).send().await {
            Ok(response) => self.classify(response.status()),
            Err(e) => ValidationOutcome::Unreachable(self.describe_transport_error(&e)),
        };

        match &outcome {
            ValidationOutcome::Valid => {
                tracing::info!(resource = %self.config.resource, id, "dependency validated");
            }
            ValidationOutcome::NotFound => {
                tracing::warn!(resource = %self.config.resource, id, "referenced entity not found");
            }
            ValidationOutcome::Unreachable(reason) => {
                tracing::error!(resource = %self.config.resource, id, %reason, "dependency unreachable");
            }
        }

        self.reachability.record_outcome(&outcome);
        metrics::counter!(
            "dependency_validations_total",
            "dependency" => self.config.dependency.clone(),
            "outcome" => outcome.label()
        )
        .increment(1);
        metrics::histogram!(
            "dependency_validation_duration_seconds",
            "dependency" => self.config.dependency.clone()
        )
        .record(started.elapsed().as_secs_f64());

        outcome
    }

    async fn probe(&self) -> ComponentStatus {
        let status = match self
            .http
            .get(self.health_url())
            .timeout(self.config.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ComponentStatus::Up,
            Ok(response) => {
                tracing::warn!(
                    dependency = %self.config.dependency,
                    status = %response.status(),
                    "health probe returned non-success status"
                );
                ComponentStatus::Down
            }
            Err(e) => {
                tracing::warn!(
                    dependency = %self.config.dependency,
                    error = %e,
                    "health probe failed"
                );
                ComponentStatus::Down
            }
        };

        self.reachability.record(status);
        status
    }

    fn last_known(&self) -> ComponentStatus {
        self.reachability.last_known()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(base: &str) -> HttpDependencyValidator {
        HttpDependencyValidator::new(ValidatorConfig::categories(base)).unwrap()
    }

    #[test]
    fn builds_resource_urls() {
        let v = validator("http://category-service:3000");
        assert_eq!(
            v.resource_url("E1").as_str(),
            "http://category-service:3000/api/categories/E1"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let v = validator("http://gateway/shop/");
        assert_eq!(
            v.resource_url("E1").as_str(),
            "http://gateway/shop/api/categories/E1"
        );
        assert_eq!(v.health_url().as_str(), "http://gateway/shop/health");
    }

    #[test]
    fn encodes_ids_as_single_segment() {
        let v = validator("http://category-service:3000");
        assert_eq!(
            v.resource_url("../admin?x=1").as_str(),
            "http://category-service:3000/api/categories/..%2Fadmin%3Fx=1"
        );
    }

    #[test]
    fn rejects_relative_or_non_http_base() {
        assert!(HttpDependencyValidator::new(ValidatorConfig::categories("category-service")).is_err());
        assert!(HttpDependencyValidator::new(ValidatorConfig::categories("mailto:a@b")).is_err());
    }

    #[test]
    fn classifies_statuses() {
        let v = validator("http://category-service:3000");
        assert_eq!(v.classify(StatusCode::OK), ValidationOutcome::Valid);
        assert_eq!(v.classify(StatusCode::NOT_FOUND), ValidationOutcome::NotFound);
        assert!(matches!(
            v.classify(StatusCode::INTERNAL_SERVER_ERROR),
            ValidationOutcome::Unreachable(_)
        ));
        assert!(matches!(
            v.classify(StatusCode::BAD_REQUEST),
            ValidationOutcome::Unreachable(_)
        ));
    }

    #[test]
    fn reachability_starts_unknown() {
        assert_eq!(
            validator("http://localhost:1").last_known(),
            ComponentStatus::Unknown
        );
    }
}
