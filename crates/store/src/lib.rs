//! Persistence for the shop services.
//!
//! Each service owns exactly one table. A store trait per table has an
//! in-memory implementation (tests, local runs without a database) and a
//! PostgreSQL implementation.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use common::{CategoryId, ProductId, ReviewId};
pub use error::{Result, StoreError};
pub use memory::{InMemoryCategoryStore, InMemoryProductStore, InMemoryReviewStore};
pub use model::{
    Category, CategoryPatch, NewCategory, NewProduct, NewReview, Product, ProductPatch, Review,
    ReviewPatch,
};
pub use postgres::{
    PostgresCategoryStore, PostgresProductStore, PostgresReviewStore, run_migrations,
};
pub use store::{CategoryStore, CategoryStoreExt, ProductStore, ProductStoreExt, ReviewStore};
