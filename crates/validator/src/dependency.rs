//! The validator trait.

use std::sync::Arc;

use async_trait::async_trait;
use common::ComponentStatus;

use crate::ValidationOutcome;

/// Checks that an entity owned by another service exists.
///
/// Implementations are stateless apart from reachability bookkeeping: every
/// call goes to the owning service, nothing is cached.
#[async_trait]
pub trait DependencyValidator: Send + Sync {
    /// Name of the owning service, e.g. `category_service`.
    fn dependency(&self) -> &str;

    /// What the validated IDs refer to, e.g. `category`.
    fn resource(&self) -> &str;

    /// Checks a single ID. Never retries.
    async fn validate(&self, id: &str) -> ValidationOutcome;

    /// Liveness probe used for health reporting only, never for gating writes.
    /// The result becomes the new `last_known` status.
    async fn probe(&self) -> ComponentStatus;

    /// Reachability observed by the most recent validation or probe.
    fn last_known(&self) -> ComponentStatus;
}

#[async_trait]
impl<T: DependencyValidator + ?Sized> DependencyValidator for Arc<T> {
    fn dependency(&self) -> &str {
        (**self).dependency()
    }

    fn resource(&self) -> &str {
        (**self).resource()
    }

    async fn validate(&self, id: &str) -> ValidationOutcome {
        (**self).validate(id).await
    }

    async fn probe(&self) -> ComponentStatus {
        (**self).probe().await
    }

    fn last_known(&self) -> ComponentStatus {
        (**self).last_known()
    }
}
