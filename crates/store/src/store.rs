use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Category, CategoryId, CategoryPatch, NewCategory, NewProduct, NewReview, Product, ProductId,
    ProductPatch, Result, Review, ReviewId, ReviewPatch,
};

/// Persistence for categories.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Inserts a category, assigning its ID and creation time.
    ///
    /// Fails with `Duplicate` if the name is already taken.
    async fn insert(&self, category: NewCategory) -> Result<Category>;

    /// Retrieves a category by ID.
    async fn get(&self, id: CategoryId) -> Result<Option<Category>>;

    /// Lists all categories in creation order.
    async fn list(&self) -> Result<Vec<Category>>;

    /// Applies a patch. Returns None if the category does not exist.
    ///
    /// An empty patch returns the current record without writing.
    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Option<Category>>;

    /// Deletes a category. Returns false if it did not exist.
    ///
    /// Products referencing the category are not touched.
    async fn delete(&self, id: CategoryId) -> Result<bool>;

    /// Checks that the datastore is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Persistence for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a product, assigning its ID and creation time.
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// Retrieves a product by ID.
    async fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Lists all products ordered by ID.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Lists the products whose category reference equals `category_id`.
    async fn list_by_category(&self, category_id: &str) -> Result<Vec<Product>>;

    /// Applies a patch. Returns None if the product does not exist.
    ///
    /// An empty patch returns the current record without writing.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>>;

    /// Deletes a product. Returns false if it did not exist.
    async fn delete(&self, id: ProductId) -> Result<bool>;

    /// Checks that the datastore is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Persistence for reviews.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Inserts a review, assigning its ID and creation time.
    async fn insert(&self, review: NewReview) -> Result<Review>;

    /// Retrieves a review by ID.
    async fn get(&self, id: ReviewId) -> Result<Option<Review>>;

    /// Lists all reviews ordered by ID.
    async fn list(&self) -> Result<Vec<Review>>;

    /// Lists the reviews attached to a product.
    async fn list_by_product(&self, product_id: ProductId) -> Result<Vec<Review>>;

    /// Applies a patch. Returns None if the review does not exist.
    async fn update(&self, id: ReviewId, patch: ReviewPatch) -> Result<Option<Review>>;

    /// Deletes a review. Returns false if it did not exist.
    async fn delete(&self, id: ReviewId) -> Result<bool>;

    /// Checks that the datastore is reachable.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl<T: CategoryStore + ?Sized> CategoryStore for Arc<T> {
    async fn insert(&self, category: NewCategory) -> Result<Category> {
        (**self).insert(category).await
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Category>> {
        (**self).list().await
    }

    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Option<Category>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: CategoryId) -> Result<bool> {
        (**self).delete(id).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}

#[async_trait]
impl<T: ProductStore + ?Sized> ProductStore for Arc<T> {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        (**self).insert(product).await
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Product>> {
        (**self).list().await
    }

    async fn list_by_category(&self, category_id: &str) -> Result<Vec<Product>> {
        (**self).list_by_category(category_id).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        (**self).delete(id).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}

#[async_trait]
impl<T: ReviewStore + ?Sized> ReviewStore for Arc<T> {
    async fn insert(&self, review: NewReview) -> Result<Review> {
        (**self).insert(review).await
    }

    async fn get(&self, id: ReviewId) -> Result<Option<Review>> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Review>> {
        (**self).list().await
    }

    async fn list_by_product(&self, product_id: ProductId) -> Result<Vec<Review>> {
        (**self).list_by_product(product_id).await
    }

    async fn update(&self, id: ReviewId, patch: ReviewPatch) -> Result<Option<Review>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ReviewId) -> Result<bool> {
        (**self).delete(id).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}

/// Convenience methods for category stores.
#[async_trait]
pub trait CategoryStoreExt: CategoryStore {
    /// Checks if a category exists.
    async fn exists(&self, id: CategoryId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

impl<T: CategoryStore + ?Sized> CategoryStoreExt for T {}

/// Convenience methods for product stores.
#[async_trait]
pub trait ProductStoreExt: ProductStore {
    /// Checks if a product exists.
    async fn exists(&self, id: ProductId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

impl<T: ProductStore + ?Sized> ProductStoreExt for T {}
