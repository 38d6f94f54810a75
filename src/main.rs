//! Course catalog API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 CATALOG API                  │
//!                         │                                              │
//!     Client Request      │  ┌─────────┐    ┌──────────┐   ┌──────────┐  │
//!     ────────────────────┼─▶│  http   │───▶│ handlers │──▶│ catalog  │  │
//!                         │  │ server  │    │ (router) │   │ snapshot │  │
//!                         │  └─────────┘    └──────────┘   └────┬─────┘  │
//!                         │                                     │        │
//!     Client Response     │  ┌─────────┐                   ┌────▼─────┐  │
//!     ◀───────────────────┼──│  JSON   │◀──────────────────│ upstream │◀─┼── Remote
//!                         │  │ encoder │                   │(optional)│  │   catalog
//!                         │  └─────────┘                   └──────────┘  │
//!                         │                                              │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use catalog_api::config::{load_config, AppConfig};
use catalog_api::lifecycle::{signals, Application, Shutdown};
use catalog_api::observability::logging;

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(about = "HTTP API for university course-catalog lookups", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override catalog.data_path
    #[arg(short, long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(data) = cli.data {
        config.catalog.data_path = Some(data);
    }

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "catalog-api starting"
    );

    let app = Application::build(config).await?;
    tracing::info!(address = %app.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    app.run(server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
