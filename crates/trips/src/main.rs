use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use trips::{config::AppConfig, run_server};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    tracing::info!(
        "Using database {} (pool {}..{}, connect timeout {:?}, socket timeout {:?})",
        config.mongo.database,
        config.mongo.min_pool_size,
        config.mongo.max_pool_size,
        config.mongo.connect_timeout,
        config.mongo.socket_timeout,
    );

    run_server(config).await
}
