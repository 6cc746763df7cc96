//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter
//! - Create the route store and pre-warm it
//! - Start the route watcher
//! - Bind the listener last, so traffic only arrives when ready

use metrics_exporter_prometheus::BuildError;
use notify::RecommendedWatcher;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::MockConfig;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::store::{RouteStore, RouteWatcher, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load route definitions: {0}")]
    Routes(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to watch route directory: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),
}

/// A server ready to run.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
    /// Kept alive for as long as the server runs.
    pub watcher: Option<RecommendedWatcher>,
}

/// Bring up every subsystem in order. Must be called inside a Tokio runtime.
pub async fn start(config: MockConfig) -> Result<Started, StartupError> {
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let store = Arc::new(RouteStore::new(&config.routes));
    if config.routes.prewarm {
        let routes = store.get_routes().await?;
        tracing::info!(routes = routes.len(), "Route cache pre-warmed");
    }

    let watcher = if config.routes.watch && store.exists(store.directory()) {
        Some(RouteWatcher::new(store.clone()).run()?)
    } else {
        if config.routes.watch {
            tracing::warn!(
                directory = %store.directory().display(),
                "Route directory missing, not watching"
            );
        }
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
        address: config.listener.bind_address.clone(),
        source,
    })?;

    tracing::info!(address = %local_addr, "Listening for connections");

    Ok(Started {
        server: HttpServer::new(config, store),
        listener,
        local_addr,
        watcher,
    })
}
