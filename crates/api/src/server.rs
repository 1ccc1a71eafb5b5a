//! Process bootstrap shared by every binary.

use std::sync::Arc;

use axum::Router;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use sqlx::postgres::PgPoolOptions;
use store::StoreError;
use thiserror::Error;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use validator::{DependencyValidator, HttpDependencyValidator, ValidatorConfig, ValidatorError};

use crate::Stores;
use crate::config::{Config, LogFormat};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to install Prometheus recorder: {0}")]
    Metrics(#[from] BuildError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("invalid dependency configuration: {0}")]
    Validator(#[from] ValidatorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs the global tracing subscriber.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

pub fn install_metrics() -> Result<PrometheusHandle, ServerError> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Connects to PostgreSQL and migrates it, or falls back to in-memory stores
/// when no database is configured.
pub async fn open_stores(config: &Config) -> Result<Stores, ServerError> {
    let Some(ref url) = config.database_url else {
        tracing::warn!("DATABASE_URL not set, data will not survive a restart");
        return Ok(Stores::in_memory());
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await?;
    store::run_migrations(&pool).await?;
    tracing::info!("database connected and migrated");

    Ok(Stores::postgres(pool))
}

pub fn http_validator(config: ValidatorConfig) -> Result<Arc<dyn DependencyValidator>, ServerError> {
    tracing::info!(
        dependency = %config.dependency,
        base_url = %config.base_url,
        "validating references over HTTP"
    );
    Ok(Arc::new(HttpDependencyValidator::new(config)?))
}

/// Binds `config.addr()` and serves `app` until SIGINT or SIGTERM.
pub async fn serve(app: Router, config: &Config, service: &str) -> Result<(), ServerError> {
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, service, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(service, "server shut down gracefully");
    Ok(())
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
