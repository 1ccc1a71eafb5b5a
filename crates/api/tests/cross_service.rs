//! Product service talking to a real category service over loopback HTTP.

use std::sync::Arc;
use std::time::Duration;

use api::Stores;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde_json::{Value, json};
use store::InMemoryProductStore;
use tokio::net::TcpListener;
use tower::ServiceExt;
use validator::{DependencyValidator, HttpDependencyValidator, ValidatorConfig};

fn metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Serves a category service on an ephemeral port. The returned router
/// shares its stores, so tests can seed categories without going over HTTP.
async fn spawn_category_service() -> (String, Router) {
    let stores = Stores::in_memory();
    let app = api::create_category_app(&stores, metrics_handle());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = app.clone();
    tokio::spawn(async move {
        axum::serve(listener, served).await.unwrap();
    });

    (format!("http://{addr}"), app)
}

async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn http_validator(base_url: &str) -> Arc<dyn DependencyValidator> {
    let config = ValidatorConfig::categories(base_url)
        .with_timeouts(Duration::from_millis(300), Duration::from_millis(1000))
        .with_probe_timeout(Duration::from_millis(300));
    Arc::new(HttpDependencyValidator::new(config).unwrap())
}

fn product_service(categories: Arc<dyn DependencyValidator>) -> (Router, InMemoryProductStore) {
    let products = InMemoryProductStore::new();
    let stores = Stores {
        products: Arc::new(products.clone()),
        ..Stores::in_memory()
    };
    (
        api::create_product_app(&stores, categories, metrics_handle()),
        products,
    )
}

#[tokio::test]
async fn product_write_follows_remote_category() {
    let (base_url, categories_app) = spawn_category_service().await;
    let (_, category) = send(
        &categories_app,
        "POST",
        "/api/categories",
        Some(json!({"name": "Electronics"})),
    )
    .await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let (app, products) = product_service(http_validator(&base_url));

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Phone", "price": 999.99, "category_id": category_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["category_id"], category_id.as_str());

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Ghost", "price": 1, "category_id": "missing-id"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "category not found: missing-id");
    assert_eq!(products.count().await, 1);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dependencies"]["category_service"], "UP");
}

#[tokio::test]
async fn deleted_remote_category_blocks_new_references_only() {
    let (base_url, categories_app) = spawn_category_service().await;
    let (_, category) = send(
        &categories_app,
        "POST",
        "/api/categories",
        Some(json!({"name": "Books"})),
    )
    .await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let (app, _) = product_service(http_validator(&base_url));
    let (status, product) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Novel", "price": 12, "category_id": category_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    send(
        &categories_app,
        "DELETE",
        &format!("/api/categories/{category_id}"),
        None,
    )
    .await;

    let (status, _) = send(&app, "GET", &format!("/api/products/{}", product["id"]), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Sequel", "price": 12, "category_id": category_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreachable_category_service_rejects_writes() {
    let base_url = closed_address().await;
    let (app, products) = product_service(http_validator(&base_url));

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({"name": "Phone", "price": 10, "category_id": "E1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("E1"));
    assert_eq!(products.count().await, 0);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["dependencies"]["category_service"], "DOWN");
}
