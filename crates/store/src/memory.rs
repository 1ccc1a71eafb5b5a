use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    Category, CategoryId, CategoryPatch, NewCategory, NewProduct, NewReview, Product, ProductId,
    ProductPatch, Result, Review, ReviewId, ReviewPatch, StoreError,
    store::{CategoryStore, ProductStore, ReviewStore},
};

/// Switch shared by clones of an in-memory store to simulate an outage.
#[derive(Debug, Clone, Default)]
struct Availability(Arc<AtomicBool>);

impl Availability {
    fn set_unavailable(&self, unavailable: bool) {
        self.0.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.0.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rows keyed by a store-assigned serial ID.
#[derive(Debug)]
struct SerialTable<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for SerialTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> SerialTable<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory category store for tests and database-less runs.
#[derive(Clone, Default)]
pub struct InMemoryCategoryStore {
    categories: Arc<RwLock<Vec<Category>>>,
    availability: Availability,
}

impl InMemoryCategoryStore {
    /// Creates a new empty in-memory category store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.set_unavailable(unavailable);
    }

    /// Returns the number of stored categories.
    pub async fn count(&self) -> usize {
        self.categories.read().await.len()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn insert(&self, category: NewCategory) -> Result<Category> {
        self.availability.check()?;
        let mut categories = self.categories.write().await;

        if categories.iter().any(|c| c.name == category.name) {
            return Err(StoreError::Duplicate {
                field: "name",
                value: category.name,
            });
        }

        let record = Category {
            id: CategoryId::new(),
            name: category.name,
            description: category.description,
            created_at: Utc::now(),
        };
        categories.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        self.availability.check()?;
        let categories = self.categories.read().await;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>> {
        self.availability.check()?;
        Ok(self.categories.read().await.clone())
    }

    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Option<Category>> {
        self.availability.check()?;
        let mut categories = self.categories.write().await;

        if let Some(ref name) = patch.name
            && categories.iter().any(|c| c.id != id && &c.name == name)
        {
            return Err(StoreError::Duplicate {
                field: "name",
                value: name.clone(),
            });
        }

        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        patch.apply(category);
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool> {
        self.availability.check()?;
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() != before)
    }

    async fn ping(&self) -> Result<()> {
        self.availability.check()
    }
}

/// In-memory product store for tests and database-less runs.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<SerialTable<Product>>>,
    availability: Availability,
}

impl InMemoryProductStore {
    /// Creates a new empty in-memory product store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.set_unavailable(unavailable);
    }

    /// Returns the number of stored products.
    pub async fn count(&self) -> usize {
        self.products.read().await.rows.len()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        self.availability.check()?;
        let mut table = self.products.write().await;
        let id = table.next_id();

        let record = Product {
            id: ProductId::new(id),
            name: product.name,
            description: product.description,
            price: product.price,
            category_id: product.category_id,
            created_at: Utc::now(),
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        self.availability.check()?;
        Ok(self.products.read().await.rows.get(&id.as_i64()).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>> {
        self.availability.check()?;
        Ok(self.products.read().await.rows.values().cloned().collect())
    }

    async fn list_by_category(&self, category_id: &str) -> Result<Vec<Product>> {
        self.availability.check()?;
        let table = self.products.read().await;
        Ok(table
            .rows
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        self.availability.check()?;
        let mut table = self.products.write().await;
        let Some(product) = table.rows.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        patch.apply(product);
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        self.availability.check()?;
        Ok(self
            .products
            .write()
            .await
            .rows
            .remove(&id.as_i64())
            .is_some())
    }

    async fn ping(&self) -> Result<()> {
        self.availability.check()
    }
}

/// In-memory review store for tests and database-less runs.
#[derive(Clone, Default)]
pub struct InMemoryReviewStore {
    reviews: Arc<RwLock<SerialTable<Review>>>,
    availability: Availability,
}

impl InMemoryReviewStore {
    /// Creates a new empty in-memory review store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.set_unavailable(unavailable);
    }

    /// Returns the number of stored reviews.
    pub async fn count(&self) -> usize {
        self.reviews.read().await.rows.len()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review> {
        self.availability.check()?;
        let mut table = self.reviews.write().await;
        let id = table.next_id();

        let record = Review {
            id: ReviewId::new(id),
            product_id: review.product_id,
            rating: review.rating,
            comment: review.comment,
            reviewer_name: review.reviewer_name,
            reviewer_email: review.reviewer_email,
            metadata: review.metadata,
            created_at: Utc::now(),
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ReviewId) -> Result<Option<Review>> {
        self.availability.check()?;
        Ok(self.reviews.read().await.rows.get(&id.as_i64()).cloned())
    }

    async fn list(&self) -> Result<Vec<Review>> {
        self.availability.check()?;
        Ok(self.reviews.read().await.rows.values().cloned().collect())
    }

    async fn list_by_product(&self, product_id: ProductId) -> Result<Vec<Review>> {
        self.availability.check()?;
        let table = self.reviews.read().await;
        Ok(table
            .rows
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: ReviewId, patch: ReviewPatch) -> Result<Option<Review>> {
        self.availability.check()?;
        let mut table = self.reviews.write().await;
        let Some(review) = table.rows.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        patch.apply(review);
        Ok(Some(review.clone()))
    }

    async fn delete(&self, id: ReviewId) -> Result<bool> {
        self.availability.check()?;
        Ok(self
            .reviews
            .write()
            .await
            .rows
            .remove(&id.as_i64())
            .is_some())
    }

    async fn ping(&self) -> Result<()> {
        self.availability.check()
    }
}
