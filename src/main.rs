//! Relay proxy binary.
//!
//! ```text
//!   Client ──GET /?u=<target>──▶ ┌──────────────────────────────┐
//!                                │ relay handler                │
//!                                │   cookie store ◀──▶ upstream ├──▶ Origin
//!   Client ◀──200 (rewritten)─── │   link rewriter              │
//!                                └──────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use relay_proxy::config::{resolve_config, validate_config, ConfigError};
use relay_proxy::lifecycle::{termination_signal, Shutdown};
use relay_proxy::observability::{logging, metrics};
use relay_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "relay-proxy")]
#[command(about = "HTTP relay that rewrites links and replays cookies per host", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind host (overrides HOST and the config file).
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT and the config file).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("relay-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        follow_redirects = config.upstream.follow_redirects,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener =
        TcpListener::bind((config.listener.host.as_str(), config.listener.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();
    let mut serve = tokio::spawn(server.run(listener, server_shutdown));

    tokio::select! {
        result = &mut serve => {
            result??;
            return Ok(());
        }
        _ = termination_signal() => shutdown.trigger(),
    }
    serve.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
