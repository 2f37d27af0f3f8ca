//! wpgate binary.
//!
//! Run with:
//!   API_KEY=... WP_BASEURL=https://blog.example.com WP_USER=... \
//!   WP_APP_PASSWORD=... RUST_LOG=info cargo run
//!
//! Try:
//!   curl localhost:8080/healthz
//!   curl -H 'x-api-key: ...' localhost:8080/mcp/tools
//!   curl -H 'x-api-key: ...' -X POST localhost:8080/mcp \
//!        -H 'content-type: application/json' \
//!        -d '{"action":"getRecentPosts"}'

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use wpgate::{Config, Gateway, Server, gateway};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), wpgate::Error> {
    let config = Config::from_env()?;
    info!(?config, "configuration loaded");

    for name in config.missing() {
        warn!("{name} is not set");
    }
    if config.api_key.is_none() {
        warn!("no API_KEY configured: every guarded request will be rejected");
    }

    let gw = Arc::new(Gateway::from_config(&config)?);
    let app = gateway::router(gw, config.api_key.clone());

    Server::bind(&config.listen_addr())?.serve(app).await
}
