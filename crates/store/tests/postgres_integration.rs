//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serial_test::serial;
use sqlx::PgPool;
use store::{
    CategoryPatch, CategoryStore, CategoryStoreExt, NewCategory, NewProduct, NewReview,
    PostgresCategoryStore, PostgresProductStore, PostgresReviewStore, ProductId, ProductPatch,
    ProductStore, ReviewPatch, ReviewStore, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            store::run_migrations(&temp_pool).await.unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared tables
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE categories, products, reviews RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn new_product(category_id: &str) -> NewProduct {
    NewProduct {
        name: "Phone".to_string(),
        description: "Smart".to_string(),
        price: Decimal::from_str("999.99").unwrap(),
        category_id: category_id.to_string(),
    }
}

#[tokio::test]
#[serial]
async fn category_round_trip_and_delete() {
    let store = PostgresCategoryStore::new(get_test_pool().await);

    let created = store
        .insert(NewCategory {
            name: "Electronics".to_string(),
            description: Some("Gadgets".to_string()),
        })
        .await
        .unwrap();

    let fetched = store.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Electronics");
    assert_eq!(fetched.description.as_deref(), Some("Gadgets"));

    assert!(store.delete(created.id).await.unwrap());
    assert!(!store.exists(created.id).await.unwrap());
}

#[tokio::test]
#[serial]
async fn duplicate_category_name_maps_to_duplicate() {
    let store = PostgresCategoryStore::new(get_test_pool().await);
    let new = NewCategory {
        name: "Books".to_string(),
        description: None,
    };

    store.insert(new.clone()).await.unwrap();
    let err = store.insert(new).await.unwrap_err();

    assert!(matches!(err, StoreError::Duplicate { field: "name", .. }));
}

#[tokio::test]
#[serial]
async fn category_partial_update() {
    let store = PostgresCategoryStore::new(get_test_pool().await);
    let created = store
        .insert(NewCategory {
            name: "Toys".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let updated = store
        .update(
            created.id,
            CategoryPatch {
                name: None,
                description: Some("For kids".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Toys");
    assert_eq!(updated.description.as_deref(), Some("For kids"));
}

#[tokio::test]
#[serial]
async fn product_insert_assigns_serial_ids() {
    let store = PostgresProductStore::new(get_test_pool().await);

    let p1 = store.insert(new_product("E1")).await.unwrap();
    let p2 = store.insert(new_product("E1")).await.unwrap();

    assert_eq!(p1.id, ProductId::new(1));
    assert_eq!(p2.id, ProductId::new(2));
    assert_eq!(p1.price, Decimal::from_str("999.99").unwrap());
    assert_eq!(p1.category_id, "E1");
}

#[tokio::test]
#[serial]
async fn product_update_keeps_unpatched_fields() {
    let store = PostgresProductStore::new(get_test_pool().await);
    let created = store.insert(new_product("E1")).await.unwrap();

    let updated = store
        .update(
            created.id,
            ProductPatch {
                price: Some(Decimal::from_str("10.50").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.price, Decimal::from_str("10.50").unwrap());
    assert_eq!(updated.name, "Phone");
    assert_eq!(updated.category_id, "E1");
}

#[tokio::test]
#[serial]
async fn product_empty_patch_returns_current_record() {
    let store = PostgresProductStore::new(get_test_pool().await);
    let created = store.insert(new_product("E1")).await.unwrap();

    let same = store
        .update(created.id, ProductPatch::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(same, created);
}

#[tokio::test]
#[serial]
async fn product_update_of_missing_row_returns_none() {
    let store = PostgresProductStore::new(get_test_pool().await);

    let result = store
        .update(
            ProductId::new(404),
            ProductPatch {
                name: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
#[serial]
async fn products_listed_by_category() {
    let store = PostgresProductStore::new(get_test_pool().await);
    store.insert(new_product("A")).await.unwrap();
    store.insert(new_product("B")).await.unwrap();
    store.insert(new_product("A")).await.unwrap();

    assert_eq!(store.list_by_category("A").await.unwrap().len(), 2);
    assert_eq!(store.list().await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn review_metadata_round_trips_as_jsonb() {
    let store = PostgresReviewStore::new(get_test_pool().await);

    let created = store
        .insert(NewReview {
            product_id: ProductId::new(7),
            rating: 5,
            comment: Some("Great".to_string()),
            reviewer_name: Some("Sam".to_string()),
            reviewer_email: Some("sam@example.com".to_string()),
            metadata: serde_json::json!({"verified": true}),
        })
        .await
        .unwrap();

    let updated = store
        .update(
            created.id,
            ReviewPatch {
                rating: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.rating, 3);
    assert_eq!(updated.metadata["verified"], true);
    assert_eq!(
        store
            .list_by_product(ProductId::new(7))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
#[serial]
async fn ping_succeeds_against_live_database() {
    let store = PostgresReviewStore::new(get_test_pool().await);
    assert!(store.ping().await.is_ok());
}
