//! httpfile-mock
//!
//! Serves canned responses described in `.http` files.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http server ──▶ routing ──▶ matched route ─────┼─▶ canned response
//!                           │        │             ▲                            │
//!                           │        │             │ Arc<Vec<Route>>            │
//!                           │        │        ┌────┴─────┐    ┌────────────┐    │
//!                           │        │        │  store   │◀───│  httpfile  │◀───┼── *.http files
//!                           │        │        │ (cache)  │    │  parser    │    │
//!                           │        ▼        └──────────┘    └────────────┘    │
//!     Fallback Response     │   no match → fallback                            │
//!     ◀─────────────────────┼──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use httpfile_mock::config::{load_config, validate_config, MockConfig};
use httpfile_mock::lifecycle::{start, wait_for_signal, Shutdown};
use httpfile_mock::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "httpfile-mock")]
#[command(about = "Serve canned HTTP responses from .http definition files", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Route definition directory (overrides the config file).
    #[arg(short, long)]
    routes: Option<PathBuf>,

    /// Bind address (overrides the config file).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => MockConfig::default(),
    };
    if let Some(routes) = args.routes {
        config.routes.directory = routes;
    }
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    init_logging(&config.observability)?;
    tracing::info!("httpfile-mock v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes_directory = %config.routes.directory.display(),
        file_pattern = %config.routes.file_pattern,
        "Configuration loaded"
    );

    let started = start(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = tokio::spawn(started.server.run(started.listener, server_shutdown));

    wait_for_signal().await;
    shutdown.trigger();
    server.await??;

    drop(started.watcher);
    tracing::info!("Shutdown complete");
    Ok(())
}
