use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::config::{load_config, GatewayConfig};
use api_gateway::http::GatewayServer;
use api_gateway::lifecycle::Shutdown;
use api_gateway::observability;

/// Single-entry-point gateway: bearer-token authentication, path routing,
/// per-route circuit breaking.
#[derive(Parser)]
#[command(name = "api-gateway", version)]
struct Args {
    /// Path to the TOML configuration file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    observability::logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        public_prefixes = config.auth.public_prefixes.len(),
        backend_timeout_secs = config.timeouts.backend_secs,
        "configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = GatewayServer::new(&config)?;

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
