//! Product service entry point.

use api::config::{Config, PRODUCT_SERVICE_PORT};
use api::server::{self, ServerError};

async fn run(config: Config) -> Result<(), ServerError> {
    let metrics_handle = server::install_metrics()?;
    let stores = server::open_stores(&config).await?;
    let categories = server::http_validator(config.category_validator())?;
    let app = api::create_product_app(&stores, categories, metrics_handle);
    server::serve(app, &config, "product-service").await
}

#[tokio::main]
async fn main() {
    let config = Config::from_env(PRODUCT_SERVICE_PORT);
    server::init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "product service failed");
        std::process::exit(1);
    }
}
