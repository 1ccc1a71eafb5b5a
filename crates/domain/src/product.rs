//! Product write paths, gated on the category dependency.

use common::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{NewProduct, Product, ProductPatch, ProductStore};
use validator::{DependencyValidator, ValidationOutcome};

use crate::gate::require_dependency;
use crate::{DomainError, Result, fields};

/// Input for creating a product. `name`, `price` and `category_id` are
/// required; they are optional here so the service can report every missing
/// field at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl CreateProduct {
    pub fn new(name: impl Into<String>, price: Decimal, category_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            price: Some(price),
            category_id: Some(category_id.into()),
        }
    }
}

/// Service for managing products.
///
/// Any write that sets a category reference first asks `V` whether the
/// category exists. Nothing is persisted unless the answer is `Valid`.
pub struct ProductService<S: ProductStore, V: DependencyValidator> {
    store: S,
    categories: V,
}

impl<S: ProductStore, V: DependencyValidator> ProductService<S, V> {
    pub fn new(store: S, categories: V) -> Self {
        Self { store, categories }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The category validator, for health reporting.
    pub fn category_validator(&self) -> &V {
        &self.categories
    }

    /// Creates a product after validating its category.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn create(&self, cmd: CreateProduct) -> Result<Product> {
        fields::require_present(&[
            ("name", cmd.name.is_some()),
            ("price", cmd.price.is_some()),
            ("category_id", cmd.category_id.is_some()),
        ])?;
        let (Some(name), Some(price), Some(category_id)) = (cmd.name, cmd.price, cmd.category_id)
        else {
            return Err(DomainError::validation("Missing required fields"));
        };

        let name = fields::non_blank("name", name)?;
        let price = fields::price(price)?;
        let category_id = fields::non_blank("category_id", category_id)?;

        require_dependency(&self.categories, &category_id).await?;

        let product = self
            .store
            .insert(NewProduct {
                name,
                description: cmd.description.unwrap_or_default(),
                price,
                category_id,
            })
            .await?;

        metrics::counter!("products_created_total").increment(1);
        tracing::info!(product_id = %product.id, category_id = %product.category_id, "product created");
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.store.list().await?)
    }

    /// Lists products in a category. The category must currently exist.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_category(&self, category_id: &str) -> Result<Vec<Product>> {
        match self.categories.validate(category_id).await {
            ValidationOutcome::Valid => Ok(self.store.list_by_category(category_id).await?),
            ValidationOutcome::NotFound => Err(DomainError::not_found("category", category_id)),
            ValidationOutcome::Unreachable(reason) => Err(DomainError::DependencyUnreachable {
                dependency: self.categories.dependency().to_string(),
                resource: self.categories.resource().to_string(),
                id: category_id.to_string(),
                reason,
            }),
        }
    }

    /// Applies a partial update.
    ///
    /// The category validator runs only when the patch carries a category
    /// reference. An empty patch returns the stored product untouched.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: ProductId, mut patch: ProductPatch) -> Result<Product> {
        if let Some(name) = patch.name.take() {
            patch.name = Some(fields::non_blank("name", name)?);
        }
        if let Some(price) = patch.price {
            fields::price(price)?;
        }
        if let Some(category_id) = patch.category_id.take() {
            patch.category_id = Some(fields::non_blank("category_id", category_id)?);
        }

        let current = self.get(id).await?;
        if patch.is_empty() {
            tracing::info!(product_id = %id, "no changes requested");
            return Ok(current);
        }

        if let Some(ref category_id) = patch.category_id {
            require_dependency(&self.categories, category_id).await?;
        }

        let product = self
            .store
            .update(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("product", id))?;

        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        if self.store.delete(id).await? {
            tracing::info!(product_id = %id, "product deleted");
            Ok(())
        } else {
            Err(DomainError::not_found("product", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use store::InMemoryProductStore;
    use validator::InMemoryDependencyValidator;

    use super::*;

    struct Harness {
        service: ProductService<InMemoryProductStore, InMemoryDependencyValidator>,
        store: InMemoryProductStore,
        categories: InMemoryDependencyValidator,
    }

    impl Harness {
        fn new() -> Self {
            let store = InMemoryProductStore::new();
            let categories = InMemoryDependencyValidator::categories();
            categories.insert("E1");
            categories.insert("E2");
            Self {
                service: ProductService::new(store.clone(), categories.clone()),
                store,
                categories,
            }
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn create_with_existing_category() {
        let h = Harness::new();
        let product = h
            .service
            .create(CreateProduct::new("Phone", dec("999.99"), "E1"))
            .await
            .unwrap();

        assert_eq!(product.category_id, "E1");
        assert_eq!(product.price, dec("999.99"));
        assert_eq!(product.description, "");
        assert_eq!(h.categories.call_count(), 1);
    }

    #[tokio::test]
    async fn create_with_missing_category_persists_nothing() {
        let h = Harness::new();
        let err = h
            .service
            .create(CreateProduct::new("Ghost", dec("1"), "missing-id"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DependencyNotFound { ref id, .. } if id == "missing-id"));
        assert_eq!(h.store.count().await, 0);
    }

    #[tokio::test]
    async fn create_with_unreachable_dependency_persists_nothing() {
        let h = Harness::new();
        h.categories.set_unreachable(true);

        let err = h
            .service
            .create(CreateProduct::new("Phone", dec("1"), "E1"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DependencyUnreachable { .. }));
        assert_eq!(h.store.count().await, 0);
    }

    #[tokio::test]
    async fn prices_outside_numeric_10_2_are_rejected() {
        let h = Harness::new();
        for price in ["1.999", "123456789", "0.00000000000000000001"] {
            let err = h
                .service
                .create(CreateProduct::new("Phone", dec(price), "E1"))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{price}");
        }
        assert_eq!(h.store.count().await, 0);
        assert_eq!(h.categories.call_count(), 0);

        let product = h
            .service
            .create(CreateProduct::new("Phone", dec("99999999.99"), "E1"))
            .await
            .unwrap();
        let err = h
            .service
            .update(
                product.id,
                ProductPatch {
                    price: Some(dec("10.005")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_reports_missing_fields_without_calling_validator() {
        let h = Harness::new();
        let err = h
            .service
            .create(CreateProduct {
                name: Some("Phone".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Missing required fields: price, category_id");
        assert_eq!(h.categories.call_count(), 0);
    }

    #[tokio::test]
    async fn create_rejects_negative_price() {
        let h = Harness::new();
        let err = h
            .service
            .create(CreateProduct::new("Phone", dec("-1"), "E1"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(h.categories.call_count(), 0);
    }

    #[tokio::test]
    async fn update_without_category_skips_validator() {
        let h = Harness::new();
        let product = h
            .service
            .create(CreateProduct::new("Phone", dec("10"), "E1"))
            .await
            .unwrap();
        h.categories.set_unreachable(true);

        let updated = h
            .service
            .update(
                product.id,
                ProductPatch {
                    price: Some(dec("12.50")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, dec("12.50"));
        assert_eq!(updated.category_id, "E1");
        assert_eq!(h.categories.call_count(), 1);
    }

    #[tokio::test]
    async fn update_with_empty_patch_is_a_no_op() {
        let h = Harness::new();
        let product = h
            .service
            .create(CreateProduct::new("Phone", dec("10"), "E1"))
            .await
            .unwrap();

        let same = h
            .service
            .update(product.id, ProductPatch::default())
            .await
            .unwrap();

        assert_eq!(same, product);
    }

    #[tokio::test]
    async fn update_with_category_validates_it() {
        let h = Harness::new();
        let product = h
            .service
            .create(CreateProduct::new("Phone", dec("10"), "E1"))
            .await
            .unwrap();

        let moved = h
            .service
            .update(
                product.id,
                ProductPatch {
                    category_id: Some("E2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.category_id, "E2");

        let err = h
            .service
            .update(
                product.id,
                ProductPatch {
                    name: Some("Renamed".to_string()),
                    category_id: Some("missing-id".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DependencyNotFound { .. }));

        let stored = h.service.get(product.id).await.unwrap();
        assert_eq!(stored.name, "Phone");
        assert_eq!(stored.category_id, "E2");
    }

    #[tokio::test]
    async fn update_of_missing_product_never_calls_validator() {
        let h = Harness::new();
        let err = h
            .service
            .update(
                ProductId::new(99),
                ProductPatch {
                    category_id: Some("E1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { entity: "product", .. }));
        assert_eq!(h.categories.call_count(), 0);
    }

    #[tokio::test]
    async fn deleted_category_leaves_reference_dangling() {
        let h = Harness::new();
        let product = h
            .service
            .create(CreateProduct::new("Phone", dec("10"), "E1"))
            .await
            .unwrap();
        h.categories.remove("E1");

        let fetched = h.service.get(product.id).await.unwrap();
        assert_eq!(fetched.category_id, "E1");
    }

    #[tokio::test]
    async fn list_by_category_requires_existing_category() {
        let h = Harness::new();
        h.service
            .create(CreateProduct::new("Phone", dec("10"), "E1"))
            .await
            .unwrap();

        assert_eq!(h.service.list_by_category("E1").await.unwrap().len(), 1);
        assert!(h.service.list_by_category("E2").await.unwrap().is_empty());
        assert!(matches!(
            h.service.list_by_category("missing-id").await,
            Err(DomainError::NotFound { entity: "category", .. })
        ));
    }

    #[tokio::test]
    async fn store_failure_is_persistence_error() {
        let h = Harness::new();
        h.store.set_unavailable(true);

        let err = h
            .service
            .create(CreateProduct::new("Phone", dec("10"), "E1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }
}
