//! In-process validators for the monolith build.
//!
//! When every service shares one process the dependency check reads the
//! owning store directly. The outcome vocabulary is the same as the HTTP
//! validator's, so services cannot tell the difference.

use async_trait::async_trait;
use common::{CategoryId, ComponentStatus, ProductId};
use store::{CategoryStore, CategoryStoreExt, ProductStore, ProductStoreExt};
use validator::{DependencyValidator, Reachability, ValidationOutcome};

/// Validates category references against a category store.
pub struct LocalCategoryValidator<S: CategoryStore> {
    store: S,
    reachability: Reachability,
}

impl<S: CategoryStore> LocalCategoryValidator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            reachability: Reachability::new(),
        }
    }
}

#[async_trait]
impl<S: CategoryStore> DependencyValidator for LocalCategoryValidator<S> {
    fn dependency(&self) -> &str {
        "category_service"
    }

    fn resource(&self) -> &str {
        "category"
    }

    async fn validate(&self, id: &str) -> ValidationOutcome {
        // An ID that does not parse cannot name a stored category.
        let Ok(category_id) = id.parse::<CategoryId>() else {
            return ValidationOutcome::NotFound;
        };

        let outcome = match self.store.exists(category_id).await {
            Ok(true) => ValidationOutcome::Valid,
            Ok(false) => ValidationOutcome::NotFound,
            Err(e) => ValidationOutcome::Unreachable(e.to_string()),
        };
        self.reachability.record_outcome(&outcome);
        outcome
    }

    async fn probe(&self) -> ComponentStatus {
        let status = match self.store.ping().await {
            Ok(()) => ComponentStatus::Up,
            Err(_) => ComponentStatus::Down,
        };
        self.reachability.record(status);
        status
    }

    fn last_known(&self) -> ComponentStatus {
        self.reachability.last_known()
    }
}

/// Validates product references against a product store.
pub struct LocalProductValidator<S: ProductStore> {
    store: S,
    reachability: Reachability,
}

impl<S: ProductStore> LocalProductValidator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            reachability: Reachability::new(),
        }
    }
}

#[async_trait]
impl<S: ProductStore> DependencyValidator for LocalProductValidator<S> {
    fn dependency(&self) -> &str {
        "product_service"
    }

    fn resource(&self) -> &str {
        "product"
    }

    async fn validate(&self, id: &str) -> ValidationOutcome {
        let Ok(product_id) = id.parse::<ProductId>() else {
            return ValidationOutcome::NotFound;
        };

        let outcome = match self.store.exists(product_id).await {
            Ok(true) => ValidationOutcome::Valid,
            Ok(false) => ValidationOutcome::NotFound,
            Err(e) => ValidationOutcome::Unreachable(e.to_string()),
        };
        self.reachability.record_outcome(&outcome);
        outcome
    }

    async fn probe(&self) -> ComponentStatus {
        let status = match self.store.ping().await {
            Ok(()) => ComponentStatus::Up,
            Err(_) => ComponentStatus::Down,
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
    use rust_decimal::Decimal;
    use store::{InMemoryCategoryStore, InMemoryProductStore, NewCategory, NewProduct};

    use super::*;

    #[tokio::test]
    async fn category_outcomes() {
        let store = InMemoryCategoryStore::new();
        let category = store
            .insert(NewCategory {
                name: "Electronics".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let validator = LocalCategoryValidator::new(store.clone());

        assert_eq!(validator.last_known(), ComponentStatus::Unknown);
        assert_eq!(
            validator.validate(&category.id.to_string()).await,
            ValidationOutcome::Valid
        );
        assert_eq!(
            validator.validate(&CategoryId::new().to_string()).await,
            ValidationOutcome::NotFound
        );
        assert_eq!(
            validator.validate("missing-id").await,
            ValidationOutcome::NotFound
        );
        assert_eq!(validator.last_known(), ComponentStatus::Up);

        store.set_unavailable(true);
        assert!(matches!(
            validator.validate(&category.id.to_string()).await,
            ValidationOutcome::Unreachable(_)
        ));
        assert_eq!(validator.last_known(), ComponentStatus::Down);
        assert_eq!(validator.probe().await, ComponentStatus::Down);
    }

    #[tokio::test]
    async fn product_outcomes() {
        let store = InMemoryProductStore::new();
        let product = store
            .insert(NewProduct {
                name: "Phone".to_string(),
                description: String::new(),
                price: Decimal::new(99999, 2),
                category_id: "E1".to_string(),
            })
            .await
            .unwrap();
        let validator = LocalProductValidator::new(store);

        assert_eq!(
            validator.validate(&product.id.to_string()).await,
            ValidationOutcome::Valid
        );
        assert_eq!(validator.validate("999").await, ValidationOutcome::NotFound);
        assert_eq!(validator.validate("abc").await, ValidationOutcome::NotFound);
        assert_eq!(validator.probe().await, ComponentStatus::Up);
    }
}
