//! HTTP surfaces for the category, product and review services.
//!
//! Each service gets its own router and binary. The `shop` binary hosts all
//! three routers in one process, sharing one set of stores and validating
//! references in-process.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{
    CategoryService, LocalCategoryValidator, LocalProductValidator, ProductService, ReviewService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use store::{
    CategoryStore, InMemoryCategoryStore, InMemoryProductStore, InMemoryReviewStore,
    PostgresCategoryStore, PostgresProductStore, PostgresReviewStore, ProductStore, ReviewStore,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use validator::DependencyValidator;

use routes::categories::CategoryState;
use routes::health::HealthState;
use routes::products::ProductState;
use routes::reviews::ReviewState;

/// One handle per store, all backed by the same datastore.
#[derive(Clone)]
pub struct Stores {
    pub categories: Arc<dyn CategoryStore>,
    pub products: Arc<dyn ProductStore>,
    pub reviews: Arc<dyn ReviewStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            categories: Arc::new(InMemoryCategoryStore::new()),
            products: Arc::new(InMemoryProductStore::new()),
            reviews: Arc::new(InMemoryReviewStore::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            categories: Arc::new(PostgresCategoryStore::new(pool.clone())),
            products: Arc::new(PostgresProductStore::new(pool.clone())),
            reviews: Arc::new(PostgresReviewStore::new(pool)),
        }
    }
}

/// Adds the routes and layers every service shares.
fn with_observability(router: Router, health: HealthState, metrics_handle: PrometheusHandle) -> Router {
    let health_router = Router::new()
        .route("/health", get(routes::health::check))
        .with_state(health);

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    router
        .merge(health_router)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

fn category_state(stores: &Stores) -> Arc<CategoryState> {
    Arc::new(CategoryState {
        service: CategoryService::new(stores.categories.clone()),
    })
}

fn product_state(stores: &Stores, categories: Arc<dyn DependencyValidator>) -> Arc<ProductState> {
    Arc::new(ProductState {
        service: ProductService::new(stores.products.clone(), categories),
    })
}

fn review_state(stores: &Stores, products: Option<Arc<dyn DependencyValidator>>) -> Arc<ReviewState> {
    let service = match products {
        Some(products) => ReviewService::with_product_validator(stores.reviews.clone(), products),
        None => ReviewService::new(stores.reviews.clone()),
    };
    Arc::new(ReviewState { service })
}

/// Creates the category service router.
pub fn create_category_app(stores: &Stores, metrics_handle: PrometheusHandle) -> Router {
    let health = HealthState::new(stores.categories.clone());
    with_observability(
        routes::categories::router(category_state(stores)),
        health,
        metrics_handle,
    )
}

/// Creates the product service router. Category references are checked
/// with `categories` before any product write.
pub fn create_product_app(
    stores: &Stores,
    categories: Arc<dyn DependencyValidator>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let health = HealthState::new(stores.products.clone()).with_dependency(categories.clone());
    with_observability(
        routes::products::router(product_state(stores, categories)),
        health,
        metrics_handle,
    )
}

/// Creates the review service router. Product references are checked only
/// when `products` is given.
pub fn create_review_app(
    stores: &Stores,
    products: Option<Arc<dyn DependencyValidator>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let mut health = HealthState::new(stores.reviews.clone());
    if let Some(ref products) = products {
        health = health.with_dependency(products.clone());
    }
    with_observability(
        routes::reviews::router(review_state(stores, products)),
        health,
        metrics_handle,
    )
}

/// Creates the single-process router hosting every service.
///
/// References are validated by reading the owning store directly. Health
/// reports the shared database only.
pub fn create_monolith_app(stores: &Stores, metrics_handle: PrometheusHandle) -> Router {
    let categories: Arc<dyn DependencyValidator> =
        Arc::new(LocalCategoryValidator::new(stores.categories.clone()));
    let products: Arc<dyn DependencyValidator> =
        Arc::new(LocalProductValidator::new(stores.products.clone()));

    let router = routes::categories::router(category_state(stores))
        .merge(routes::products::router(product_state(stores, categories)))
        .merge(routes::reviews::router(review_state(stores, Some(products))));

    with_observability(router, HealthState::new(stores.categories.clone()), metrics_handle)
}
