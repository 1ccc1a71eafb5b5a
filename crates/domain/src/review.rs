//! Review write paths.

use std::sync::Arc;

use common::{ProductId, ReviewId};
use serde::{Deserialize, Serialize};
use store::{NewReview, Review, ReviewPatch, ReviewStore};
use validator::{DependencyValidator, ValidationOutcome};

use crate::gate::require_dependency;
use crate::{DomainError, Result, fields};

/// Input for creating a review. `product_id` and `rating` are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CreateReview {
    pub fn new(product_id: ProductId, rating: i32) -> Self {
        Self {
            product_id: Some(product_id),
            rating: Some(rating),
            ..Default::default()
        }
    }
}

/// Service for managing reviews.
///
/// Product references are only checked when a product validator is
/// configured. Without one the reference is stored as given.
pub struct ReviewService<S: ReviewStore, V: DependencyValidator = Arc<dyn DependencyValidator>> {
    store: S,
    products: Option<V>,
}

impl<S: ReviewStore> ReviewService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            products: None,
        }
    }
}

impl<S: ReviewStore, V: DependencyValidator> ReviewService<S, V> {
    pub fn with_product_validator(store: S, products: V) -> Self {
        Self {
            store,
            products: Some(products),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn product_validator(&self) -> Option<&V> {
        self.products.as_ref()
    }

    async fn check_product(&self, product_id: ProductId) -> Result<()> {
        match &self.products {
            Some(products) => require_dependency(products, &product_id.to_string()).await,
            None => Ok(()),
        }
    }

    #[tracing::instrument(skip(self, cmd))]
    pub async fn create(&self, cmd: CreateReview) -> Result<Review> {
        fields::require_present(&[
            ("product_id", cmd.product_id.is_some()),
            ("rating", cmd.rating.is_some()),
        ])?;
        let (Some(product_id), Some(rating)) = (cmd.product_id, cmd.rating) else {
            return Err(DomainError::validation("Missing required fields"));
        };

        let product_id = fields::product_id(product_id)?;
        let rating = fields::rating(rating)?;
        let reviewer_name = cmd
            .reviewer_name
            .map(|name| fields::bounded("reviewer_name", name))
            .transpose()?;
        let reviewer_email = cmd.reviewer_email.map(fields::email).transpose()?;
        let metadata = match cmd.metadata {
            Some(value) => fields::metadata(value)?,
            None => serde_json::json!({}),
        };

        self.check_product(product_id).await?;

        let review = self
            .store
            .insert(NewReview {
                product_id,
                rating,
                comment: cmd.comment,
                reviewer_name,
                reviewer_email,
                metadata,
            })
            .await?;

        metrics::counter!("reviews_created_total").increment(1);
        tracing::info!(review_id = %review.id, product_id = %review.product_id, "review created");
        Ok(review)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: ReviewId) -> Result<Review> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("review", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Review>> {
        Ok(self.store.list().await?)
    }

    /// Lists the reviews attached to a product.
    ///
    /// With a product validator the product must currently exist. Without
    /// one, unknown products yield an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_product(&self, product_id: ProductId) -> Result<Vec<Review>> {
        if let Some(products) = &self.products {
            let id = product_id.to_string();
            match products.validate(&id).await {
                ValidationOutcome::Valid => {}
                ValidationOutcome::NotFound => {
                    return Err(DomainError::not_found("product", product_id));
                }
                ValidationOutcome::Unreachable(reason) => {
                    return Err(DomainError::DependencyUnreachable {
                        dependency: products.dependency().to_string(),
                        resource: products.resource().to_string(),
                        id,
                        reason,
                    });
                }
            }
        }
        Ok(self.store.list_by_product(product_id).await?)
    }

    /// Applies a partial update. The product reference is re-checked only
    /// when it changes.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: ReviewId, mut patch: ReviewPatch) -> Result<Review> {
        if let Some(product_id) = patch.product_id {
            fields::product_id(product_id)?;
        }
        if let Some(rating) = patch.rating {
            fields::rating(rating)?;
        }
        if let Some(name) = patch.reviewer_name.take() {
            patch.reviewer_name = Some(fields::bounded("reviewer_name", name)?);
        }
        if let Some(email) = patch.reviewer_email.take() {
            patch.reviewer_email = Some(fields::email(email)?);
        }
        if let Some(metadata) = patch.metadata.take() {
            patch.metadata = Some(fields::metadata(metadata)?);
        }

        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        if let Some(product_id) = patch.product_id
            && product_id != current.product_id
        {
            self.check_product(product_id).await?;
        }

        let review = self
            .store
            .update(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("review", id))?;

        tracing::info!(review_id = %id, "review updated");
        Ok(review)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ReviewId) -> Result<()> {
        if self.store.delete(id).await? {
            tracing::info!(review_id = %id, "review deleted");
            Ok(())
        } else {
            Err(DomainError::not_found("review", id))
        }
    }
}
