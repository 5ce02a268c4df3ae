//! Ghost Broker dashboard client - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Ghost Broker dashboard client
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via GHOST_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    ghost_telemetry::init_logging()?;

    info!("Starting Ghost Broker v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > GHOST_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("GHOST_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = ghost_app::AppConfig::load(&config_path)?;

    let app = ghost_app::Application::new(config)?;
    app.run().await?;

    Ok(())
}
