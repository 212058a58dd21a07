//! Parish API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p parish-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` when present).
//! Without `DATABASE_URL` the server runs on the in-memory store.

use parish_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {}", e);
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Parish API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        persistent = config.database.url.is_some(),
        "Configuration loaded"
    );

    parish_api::run(config).await?;

    Ok(())
}
