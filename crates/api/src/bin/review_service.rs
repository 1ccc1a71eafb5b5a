//! Review service entry point.

use api::config::{Config, REVIEW_SERVICE_PORT};
use api::server::{self, ServerError};

async fn run(config: Config) -> Result<(), ServerError> {
    let metrics_handle = server::install_metrics()?;
    let stores = server::open_stores(&config).await?;
    let products = match config.product_validator() {
        Some(products) => Some(server::http_validator(products)?),
        None => {
            tracing::info!("PRODUCT_SERVICE_URL not set, product references are not validated");
            None
        }
    };
    let app = api::create_review_app(&stores, products, metrics_handle);
    server::serve(app, &config, "review-service").await
}

#[tokio::main]
async fn main() {
    let config = Config::from_env(REVIEW_SERVICE_PORT);
    server::init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "review service failed");
        std::process::exit(1);
    }
}
