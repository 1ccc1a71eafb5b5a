//! Domain layer for the shop services.
//!
//! This crate provides:
//! - `CategoryService`, `ProductService` and `ReviewService` over the stores
//! - The write-time dependency gate used by products (and, opt-in, reviews)
//! - In-process validators for deployments where the stores share a process
//! - The `DomainError` taxonomy surfaced by the HTTP layer

pub mod category;
pub mod error;
pub mod fields;
pub mod gate;
pub mod local;
pub mod product;
pub mod review;

pub use category::{CategoryService, CreateCategory};
pub use error::{DomainError, Result};
pub use local::{LocalCategoryValidator, LocalProductValidator};
pub use product::{CreateProduct, ProductService};
pub use review::{CreateReview, ReviewService};
