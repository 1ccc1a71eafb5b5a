//! Category write paths.

use common::CategoryId;
use serde::{Deserialize, Serialize};
use store::{Category, CategoryPatch, CategoryStore, NewCategory};

use crate::{DomainError, Result, fields};

/// Input for creating a category. Every field is optional so that missing
/// fields are reported as validation errors rather than decode failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateCategory {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }
}

/// Service for managing categories.
///
/// Deleting a category never looks at products: references held by the
/// product service are allowed to dangle.
pub struct CategoryService<S: CategoryStore> {
    store: S,
}

impl<S: CategoryStore> CategoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(skip(self, cmd))]
    pub async fn create(&self, cmd: CreateCategory) -> Result<Category> {
        let Some(name) = cmd.name else {
            return Err(DomainError::validation("Missing required fields: name"));
        };
        let name = fields::non_blank("name", name)?;

        let category = self
            .store
            .insert(NewCategory {
                name,
                description: cmd.description,
            })
            .await?;

        metrics::counter!("categories_created_total").increment(1);
        tracing::info!(category_id = %category.id, "category created");
        Ok(category)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: CategoryId) -> Result<Category> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.store.list().await?)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: CategoryId, mut patch: CategoryPatch) -> Result<Category> {
        if let Some(name) = patch.name.take() {
            patch.name = Some(fields::non_blank("name", name)?);
        }

        self.store
            .update(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        if self.store.delete(id).await? {
            tracing::info!(category_id = %id, "category deleted");
            Ok(())
        } else {
            Err(DomainError::not_found("category", id))
        }
    }
}
