//! Turns a validation outcome into a write decision.

use validator::{DependencyValidator, ValidationOutcome};

use crate::{DomainError, Result};

/// Asks `validator` whether `id` exists and rejects the write unless it does.
///
/// `NotFound` and `Unreachable` both reject; neither is retried.
pub async fn require_dependency<V>(validator: &V, id: &str) -> Result<()>
where
    V: DependencyValidator + ?Sized,
{
    match validator.validate(id).await {
        ValidationOutcome::Valid => Ok(()),
        ValidationOutcome::NotFound => {
            metrics::counter!("writes_rejected_total", "reason" => "dependency_not_found")
                .increment(1);
            Err(DomainError::DependencyNotFound {
                dependency: validator.dependency().to_string(),
                resource: validator.resource().to_string(),
                id: id.to_string(),
            })
        }
        ValidationOutcome::Unreachable(reason) => {
            metrics::counter!("writes_rejected_total", "reason" => "dependency_unreachable")
                .increment(1);
            Err(DomainError::DependencyUnreachable {
                dependency: validator.dependency().to_string(),
                resource: validator.resource().to_string(),
                id: id.to_string(),
                reason,
            })
        }
    }
}
