//! Category CRUD endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::CategoryId;
use domain::{CategoryService, CreateCategory};
use serde_json::{Value, json};
use store::{Category, CategoryPatch, CategoryStore};

use crate::error::ApiError;

/// Shared state for the category handlers.
pub struct CategoryState {
    pub service: CategoryService<Arc<dyn CategoryStore>>,
}

pub fn router(state: Arc<CategoryState>) -> Router {
    Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/{id}", get(fetch).put(update).delete(remove))
        .with_state(state)
}

/// A malformed ID cannot name a stored category, so it is reported as missing.
fn parse_category_id(raw: &str) -> Result<CategoryId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("category not found: {raw}")))
}

/// GET /api/categories
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<CategoryState>>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

/// POST /api/categories
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<CategoryState>>,
    payload: Result<Json<CreateCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(cmd) = payload?;
    let category = state.service.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn fetch(
    State(state): State<Arc<CategoryState>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_category_id(&id)?;
    Ok(Json(state.service.get(id).await?))
}

/// PUT /api/categories/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<CategoryState>>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryPatch>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_category_id(&id)?;
    let Json(patch) = payload?;
    Ok(Json(state.service.update(id, patch).await?))
}

/// DELETE /api/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<CategoryState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_category_id(&id)?;
    state.service.delete(id).await?;
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
