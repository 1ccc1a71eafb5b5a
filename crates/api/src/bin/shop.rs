//! Single-process deployment hosting every service.

use api::config::{Config, SHOP_PORT};
use api::server::{self, ServerError};

async fn run(config: Config) -> Result<(), ServerError> {
    let metrics_handle = server::install_metrics()?;
    let stores = server::open_stores(&config).await?;
    let app = api::create_monolith_app(&stores, metrics_handle);
    server::serve(app, &config, "shop").await
}

#[tokio::main]
async fn main() {
    let config = Config::from_env(SHOP_PORT);
    server::init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "shop failed");
        std::process::exit(1);
    }
}
