//! Category service entry point.

use api::config::{CATEGORY_SERVICE_PORT, Config};
use api::server::{self, ServerError};

async fn run(config: Config) -> Result<(), ServerError> {
    let metrics_handle = server::install_metrics()?;
    let stores = server::open_stores(&config).await?;
    let app = api::create_category_app(&stores, metrics_handle);
    server::serve(app, &config, "category-service").await
}

#[tokio::main]
async fn main() {
    let config = Config::from_env(CATEGORY_SERVICE_PORT);
    server::init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "category service failed");
        std::process::exit(1);
    }
}
