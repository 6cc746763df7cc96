//! Route directory watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::store::cache::RouteStore;

/// Pause after the first change so bursts of editor writes reload once.
const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Watches the route directory and reloads the store on change.
pub struct RouteWatcher {
    directory: PathBuf,
    store: Arc<RouteStore>,
}

impl RouteWatcher {
    pub fn new(store: Arc<RouteStore>) -> Self {
        Self {
            directory: store.directory().to_path_buf(),
            store,
        }
    }

    /// Start watching. The returned watcher must be kept alive.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        let _ = change_tx.send(());
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.directory, RecursiveMode::NonRecursive)?;
        tracing::info!(directory = ?self.directory, "Route watcher started");

        tokio::spawn(reload_on_change(self.store, change_rx));
        Ok(watcher)
    }
}

async fn reload_on_change(store: Arc<RouteStore>, mut changes: mpsc::UnboundedReceiver<()>) {
    while changes.recv().await.is_some() {
        tokio::time::sleep(SETTLE_DELAY).await;
        while changes.try_recv().is_ok() {}

        tracing::info!("Route definition change detected, reloading...");
        match store.reload().await {
            Ok(routes) => tracing::info!(routes = routes.len(), "Route definitions reloaded"),
            Err(e) => tracing::error!(
                "Failed to reload route definitions: {}. Keeping current routes.",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutesConfig;

    #[tokio::test]
    async fn test_change_triggers_reload() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.http"), "GET /a\n").unwrap();
        let store = Arc::new(RouteStore::new(&RoutesConfig {
            directory: dir.path().to_path_buf(),
            ..RoutesConfig::default()
        }));
        assert_eq!(store.get_routes().await.unwrap().len(), 1);

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(reload_on_change(store.clone(), rx));

        std::fs::write(dir.path().join("b.http"), "GET /b\n").unwrap();
        tx.send(()).unwrap();
        tx.send(()).unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(store.get_routes().await.unwrap().len(), 2);
    }
}
