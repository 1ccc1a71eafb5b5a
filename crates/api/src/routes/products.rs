//! Product CRUD endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::ProductId;
use domain::{CreateProduct, ProductService};
use serde_json::{Value, json};
use store::{Product, ProductPatch, ProductStore};
use validator::DependencyValidator;

use crate::error::ApiError;

/// Shared state for the product handlers.
pub struct ProductState {
    pub service: ProductService<Arc<dyn ProductStore>, Arc<dyn DependencyValidator>>,
}

pub fn router(state: Arc<ProductState>) -> Router {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/{id}", get(fetch).put(update).delete(remove))
        .route("/api/products/category/{category_id}", get(by_category))
        .with_state(state)
}

pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("product not found: {raw}")))
}

/// GET /api/products
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<ProductState>>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

/// POST /api/products. The category must exist before anything is written.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<ProductState>>,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(cmd) = payload?;
    let product = state.service.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/{id}
#[tracing::instrument(skip(state))]
pub async fn fetch(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;
    Ok(Json(state.service.get(id).await?))
}

/// PUT /api/products/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;
    let Json(patch) = payload?;
    Ok(Json(state.service.update(id, patch).await?))
}

/// DELETE /api/products/{id}
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_product_id(&id)?;
    state.service.delete(id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

/// GET /api/products/category/{category_id}
#[tracing::instrument(skip(state))]
pub async fn by_category(
    State(state): State<Arc<ProductState>>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.service.list_by_category(&category_id).await?))
}
