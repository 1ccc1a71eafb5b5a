//! Review CRUD endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use common::ReviewId;
use domain::{CreateReview, ReviewService};
use serde_json::{Value, json};
use store::{Review, ReviewPatch, ReviewStore};
use validator::DependencyValidator;

use crate::error::ApiError;
use crate::routes::products::parse_product_id;

/// Shared state for the review handlers.
pub struct ReviewState {
    pub service: ReviewService<Arc<dyn ReviewStore>, Arc<dyn DependencyValidator>>,
}

pub fn router(state: Arc<ReviewState>) -> Router {
    Router::new()
        .route("/api/reviews", get(list).post(create))
        .route("/api/reviews/{id}", get(fetch).put(update).delete(remove))
        .route("/api/products/{id}/reviews", get(by_product))
        .with_state(state)
}

fn parse_review_id(raw: &str) -> Result<ReviewId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("review not found: {raw}")))
}

/// GET /api/reviews
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<ReviewState>>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

/// POST /api/reviews
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<ReviewState>>,
    payload: Result<Json<CreateReview>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let Json(cmd) = payload?;
    let review = state.service.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/reviews/{id}
#[tracing::instrument(skip(state))]
pub async fn fetch(
    State(state): State<Arc<ReviewState>>,
    Path(id): Path<String>,
) -> Result<Json<Review>, ApiError> {
    let id = parse_review_id(&id)?;
    Ok(Json(state.service.get(id).await?))
}

/// PUT /api/reviews/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<ReviewState>>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewPatch>, JsonRejection>,
) -> Result<Json<Review>, ApiError> {
    let id = parse_review_id(&id)?;
    let Json(patch) = payload?;
    Ok(Json(state.service.update(id, patch).await?))
}

/// DELETE /api/reviews/{id}
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<ReviewState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_review_id(&id)?;
    state.service.delete(id).await?;
    Ok(Json(json!({ "message": "Review deleted successfully" })))
}

/// GET /api/products/{id}/reviews
#[tracing::instrument(skip(state))]
pub async fn by_product(
    State(state): State<Arc<ReviewState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let product_id = parse_product_id(&id)?;
    Ok(Json(state.service.list_by_product(product_id).await?))
}
