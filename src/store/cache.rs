//! Route store: lazily loaded, shared route snapshot.
//!
//! # Responsibilities
//! - Load every definition file in the configured directory
//! - Publish the compiled routes as one immutable snapshot
//! - Populate exactly once, however many callers race on first access
//! - Replace the snapshot on explicit reload
//!
//! # Design Decisions
//! - Readers take a lock-free `ArcSwap` load; only population takes the mutex
//! - A missing directory is an empty route list, not an error
//! - By default one malformed file fails the whole load; `skip_invalid_files`
//!   isolates failures per file instead
//! - A failed reload keeps the previous snapshot

use arc_swap::ArcSwapOption;
use glob::{Pattern, PatternError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::RoutesConfig;
use crate::httpfile::{parse_routes, FormatError, Route};
use crate::observability::metrics;
use crate::store::fs::{FileReader, FsFileReader};

/// Errors raised while populating the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shared, read-mostly collection of compiled routes.
#[derive(Debug)]
pub struct RouteStore {
    directory: PathBuf,
    file_pattern: String,
    skip_invalid_files: bool,
    reader: Arc<dyn FileReader>,
    routes: ArcSwapOption<Vec<Route>>,
    populate_lock: Mutex<()>,
}

impl RouteStore {
    /// Create a store reading from the local file system.
    pub fn new(config: &RoutesConfig) -> Self {
        Self::with_reader(config, Arc::new(FsFileReader))
    }

    pub fn with_reader(config: &RoutesConfig, reader: Arc<dyn FileReader>) -> Self {
        Self {
            directory: config.directory.clone(),
            file_pattern: config.file_pattern.clone(),
            skip_invalid_files: config.skip_invalid_files,
            reader,
            routes: ArcSwapOption::empty(),
            populate_lock: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Whether `path` names an existing directory or file.
    pub fn exists(&self, path: &Path) -> bool {
        self.reader.directory_exists(path) || self.reader.file_exists(path)
    }

    /// True once a snapshot has been published.
    pub fn is_populated(&self) -> bool {
        self.routes.load().is_some()
    }

    /// The route snapshot, populating it on first use.
    pub async fn get_routes(&self) -> Result<Arc<Vec<Route>>, StoreError> {
        if let Some(routes) = self.routes.load_full() {
            return Ok(routes);
        }

        let _guard = self.populate_lock.lock().await;
        if let Some(routes) = self.routes.load_full() {
            return Ok(routes);
        }

        let routes = Arc::new(self.populate().await?);
        self.routes.store(Some(routes.clone()));
        Ok(routes)
    }

    /// Re-read every definition file and publish the result.
    ///
    /// On failure the previously published snapshot stays in place.
    pub async fn reload(&self) -> Result<Arc<Vec<Route>>, StoreError> {
        let _guard = self.populate_lock.lock().await;

        match self.populate().await {
            Ok(routes) => {
                let routes = Arc::new(routes);
                self.routes.store(Some(routes.clone()));
                metrics::record_reload(true);
                Ok(routes)
            }
            Err(e) => {
                metrics::record_reload(false);
                Err(e)
            }
        }
    }

    async fn populate(&self) -> Result<Vec<Route>, StoreError> {
        if !self.reader.directory_exists(&self.directory) {
            tracing::warn!(
                directory = %self.directory.display(),
                "Route directory does not exist, serving no routes"
            );
            metrics::record_routes_loaded(0);
            return Ok(Vec::new());
        }

        let pattern = Pattern::new(&self.file_pattern).map_err(|source| StoreError::Pattern {
            pattern: self.file_pattern.clone(),
            source,
        })?;

        let files = self
            .reader
            .list_files(&self.directory, &pattern)
            .await
            .map_err(|source| StoreError::Io {
                path: self.directory.clone(),
                source,
            })?;

        let mut routes = Vec::new();
        for file in &files {
            match self.load_file(file).await {
                Ok(parsed) => routes.extend(parsed),
                Err(StoreError::Format(e)) if self.skip_invalid_files => {
                    tracing::warn!(
                        file = %file.display(),
                        error = %e,
                        "Skipping invalid definition file"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            directory = %self.directory.display(),
            files = files.len(),
            routes = routes.len(),
            "Route definitions loaded"
        );
        metrics::record_routes_loaded(routes.len());
        Ok(routes)
    }

    async fn load_file(&self, path: &Path) -> Result<Vec<Route>, StoreError> {
        let content = self
            .reader
            .read_all_text(path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(parse_routes(&file_name, &content)?)
    }
}
