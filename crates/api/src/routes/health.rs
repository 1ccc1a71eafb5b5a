//! Health check endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::ComponentStatus;
use serde::Serialize;
use store::{CategoryStore, ProductStore, ReviewStore};
use validator::DependencyValidator;

/// Something whose datastore can be pinged.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn check(&self) -> ComponentStatus;
}

fn status_of(result: store::Result<()>) -> ComponentStatus {
    match result {
        Ok(()) => ComponentStatus::Up,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            ComponentStatus::Down
        }
    }
}

#[async_trait]
impl DatabaseProbe for Arc<dyn CategoryStore> {
    async fn check(&self) -> ComponentStatus {
        status_of(CategoryStore::ping(self).await)
    }
}

#[async_trait]
impl DatabaseProbe for Arc<dyn ProductStore> {
    async fn check(&self) -> ComponentStatus {
        status_of(ProductStore::ping(self).await)
    }
}

#[async_trait]
impl DatabaseProbe for Arc<dyn ReviewStore> {
    async fn check(&self) -> ComponentStatus {
        status_of(ReviewStore::ping(self).await)
    }
}

/// What a service reports on: its own datastore and the services it calls.
#[derive(Clone)]
pub struct HealthState {
    database: Arc<dyn DatabaseProbe>,
    dependencies: Vec<Arc<dyn DependencyValidator>>,
}

impl HealthState {
    pub fn new(database: impl DatabaseProbe + 'static) -> Self {
        Self {
            database: Arc::new(database),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dependency: Arc<dyn DependencyValidator>) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub database: ComponentStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, ComponentStatus>,
}

/// GET /health
///
/// Overall status follows the database alone. Dependencies are probed and
/// reported but never make the service unhealthy. Changes against the
/// last-known reachability are logged.
pub async fn check(State(health): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = health.database.check().await;

    let mut dependencies = BTreeMap::new();
    for dependency in &health.dependencies {
        let previous = dependency.last_known();
        let status = dependency.probe().await;
        if status != previous {
            if status.is_up() {
                tracing::info!(dependency = dependency.dependency(), %previous, "dependency reachable");
            } else {
                tracing::warn!(dependency = dependency.dependency(), %previous, %status, "dependency probe failed");
            }
        }
        dependencies.insert(dependency.dependency().to_string(), status);
    }

    let (code, status) = if database.is_up() {
        (StatusCode::OK, ComponentStatus::Up)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ComponentStatus::Down)
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            dependencies,
        }),
    )
}
