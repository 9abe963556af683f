//! # Backend Service
//!
//! Loads `.env`, configuration and tracing, then hands off to [`start_server`].

use backend::{init_tracing, start_server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    start_server(config).await
}
