use anyhow::Result;
use dotenvy::dotenv;
use moviescope::config::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    let config = Config::from_env()?;
    info!("All required environment variables are set");
    moviescope::app::run_server(config).await
}
