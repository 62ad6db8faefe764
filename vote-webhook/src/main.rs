//! Votehook Web Server - standalone vote webhook receiver.
//!
//! Runs without a bot attached: votes are authenticated and logged only.
//! Embed the library to act on them.

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use votehook::{Config, WebhookServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the filter is built so RUST_LOG can live there too
    let dotenv = dotenvy::dotenv();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "dotenv_load_failed");
        }
    }

    info!("web_server_starting");

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "config_invalid");
            return Err(e).context("Failed to load configuration");
        }
    };
    info!(
        port = config.port,
        secret_length = config.verify_secret.len(),
        "config_loaded"
    );

    WebhookServer::new(config)
        .run()
        .await
        .context("Webhook server failed")?;

    info!("web_server_shutdown_complete");

    Ok(())
}
