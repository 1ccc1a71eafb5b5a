//! Validator construction errors.

use thiserror::Error;

/// Errors raised while building a validator. Validation itself never fails;
/// it reports `ValidationOutcome::Unreachable` instead.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The configured base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
