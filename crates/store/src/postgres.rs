use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Category, CategoryId, CategoryPatch, NewCategory, NewProduct, NewReview, Product, ProductId,
    ProductPatch, Result, Review, ReviewId, ReviewPatch, StoreError,
    store::{CategoryStore, ProductStore, ReviewStore},
};

const CATEGORY_COLUMNS: &str = "id, name, description, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, category_id, created_at";
const REVIEW_COLUMNS: &str =
    "id, product_id, rating, comment, reviewer_name, reviewer_email, metadata, created_at";

/// Runs the database migrations shared by all three stores.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let migrator = sqlx::migrate!("../../migrations");
    migrator.run(pool).await?;
    tracing::info!(migrations = migrator.iter().count(), "database migrations applied");
    Ok(())
}

async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn map_category_write_error(e: sqlx::Error, name: Option<&str>) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.constraint() == Some("unique_category_name")
    {
        tracing::debug!(name = name.unwrap_or_default(), "category name already taken");
        return StoreError::Duplicate {
            field: "name",
            value: name.unwrap_or_default().to_string(),
        };
    }
    tracing::warn!(error = %e, "category write failed");
    StoreError::Database(e)
}

/// PostgreSQL-backed category store.
#[derive(Clone)]
pub struct PostgresCategoryStore {
    pool: PgPool,
}

impl PostgresCategoryStore {
    /// Creates a new PostgreSQL category store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_category(row: PgRow) -> Result<Category> {
        Ok(Category {
            id: CategoryId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn insert(&self, category: NewCategory) -> Result<Category> {
        let sql = format!(
            "INSERT INTO categories (id, name, description) VALUES ($1, $2, $3) RETURNING {CATEGORY_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&category.name)
            .bind(&category.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_category_write_error(e, Some(&category.name)))?;

        Self::row_to_category(row)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_category).transpose()
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at, id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(Self::row_to_category).collect()
    }

    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Option<Category>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut sets = Vec::new();
        let mut param_count = 0;
        if patch.name.is_some() {
            param_count += 1;
            sets.push(format!("name = ${param_count}"));
        }
        if patch.description.is_some() {
            param_count += 1;
            sets.push(format!("description = ${param_count}"));
        }
        param_count += 1;
        let sql = format!(
            "UPDATE categories SET {} WHERE id = ${param_count} RETURNING {CATEGORY_COLUMNS}",
            sets.join(", ")
        );

        let name = patch.name.clone();
        let mut query = sqlx::query(&sql);
        if let Some(name) = patch.name {
            query = query.bind(name);
        }
        if let Some(description) = patch.description {
            query = query.bind(description);
        }

        let row = query
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_category_write_error(e, name.as_deref()))?;

        row.map(Self::row_to_category).transpose()
    }

    async fn delete(&self, id: CategoryId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        ping(&self.pool).await
    }
}

/// PostgreSQL-backed product store.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Creates a new PostgreSQL product store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            category_id: row.try_get("category_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let sql = format!(
            r#"
            INSERT INTO products (name, description, price, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category_id)
            .fetch_one(&self.pool)
            .await?;

        Self::row_to_product(row)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn list_by_category(&self, category_id: &str) -> Result<Vec<Product>> {
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1 ORDER BY id ASC");
        let rows = sqlx::query(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut sets = Vec::new();
        let mut param_count = 0;
        if patch.name.is_some() {
            param_count += 1;
            sets.push(format!("name = ${param_count}"));
        }
        if patch.description.is_some() {
            param_count += 1;
            sets.push(format!("description = ${param_count}"));
        }
        if patch.price.is_some() {
            param_count += 1;
            sets.push(format!("price = ${param_count}"));
        }
        if patch.category_id.is_some() {
            param_count += 1;
            sets.push(format!("category_id = ${param_count}"));
        }
        param_count += 1;
        let sql = format!(
            "UPDATE products SET {} WHERE id = ${param_count} RETURNING {PRODUCT_COLUMNS}",
            sets.join(", ")
        );

        let mut query = sqlx::query(&sql);
        if let Some(name) = patch.name {
            query = query.bind(name);
        }
        if let Some(description) = patch.description {
            query = query.bind(description);
        }
        if let Some(price) = patch.price {
            query = query.bind(price);
        }
        if let Some(category_id) = patch.category_id {
            query = query.bind(category_id);
        }

        let row = query
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn delete(&self, id: ProductId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        ping(&self.pool).await
    }
}

/// PostgreSQL-backed review store.
#[derive(Clone)]
pub struct PostgresReviewStore {
    pool: PgPool,
}

impl PostgresReviewStore {
    /// Creates a new PostgreSQL review store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_review(row: PgRow) -> Result<Review> {
        Ok(Review {
            id: ReviewId::new(row.try_get("id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
            reviewer_name: row.try_get("reviewer_name")?,
            reviewer_email: row.try_get("reviewer_email")?,
            metadata: row.try_get("metadata")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ReviewStore for PostgresReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review> {
        let sql = format!(
            r#"
            INSERT INTO reviews (product_id, rating, comment, reviewer_name, reviewer_email, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REVIEW_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(review.product_id.as_i64())
            .bind(review.rating)
            .bind(&review.comment)
            .bind(&review.reviewer_name)
            .bind(&review.reviewer_email)
            .bind(&review.metadata)
            .fetch_one(&self.pool)
            .await?;

        Self::row_to_review(row)
    }

    async fn get(&self, id: ReviewId) -> Result<Option<Review>> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_review).transpose()
    }

    async fn list(&self) -> Result<Vec<Review>> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY id ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(Self::row_to_review).collect()
    }

    async fn list_by_product(&self, product_id: ProductId) -> Result<Vec<Review>> {
        let sql =
            format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = $1 ORDER BY id ASC");
        let rows = sqlx::query(&sql)
            .bind(product_id.as_i64())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_review).collect()
    }

    async fn update(&self, id: ReviewId, patch: ReviewPatch) -> Result<Option<Review>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut sets = Vec::new();
        let mut param_count = 0;
        for (column, present) in [
            ("product_id", patch.product_id.is_some()),
            ("rating", patch.rating.is_some()),
            ("comment", patch.comment.is_some()),
            ("reviewer_name", patch.reviewer_name.is_some()),
            ("reviewer_email", patch.reviewer_email.is_some()),
            ("metadata", patch.metadata.is_some()),
        ] {
            if present {
                param_count += 1;
                sets.push(format!("{column} = ${param_count}"));
            }
        }
        param_count += 1;
        let sql = format!(
            "UPDATE reviews SET {} WHERE id = ${param_count} RETURNING {REVIEW_COLUMNS}",
            sets.join(", ")
        );

        // Bind order must match the column order above.
        let mut query = sqlx::query(&sql);
        if let Some(product_id) = patch.product_id {
            query = query.bind(product_id.as_i64());
        }
        if let Some(rating) = patch.rating {
            query = query.bind(rating);
        }
        if let Some(comment) = patch.comment {
            query = query.bind(comment);
        }
        if let Some(reviewer_name) = patch.reviewer_name {
            query = query.bind(reviewer_name);
        }
        if let Some(reviewer_email) = patch.reviewer_email {
            query = query.bind(reviewer_email);
        }
        if let Some(metadata) = patch.metadata {
            query = query.bind(metadata);
        }

        let row = query
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_review).transpose()
    }

    async fn delete(&self, id: ReviewId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        ping(&self.pool).await
    }
}
