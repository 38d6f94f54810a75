//! Dataset file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::catalog::{Catalog, Dataset};
use crate::observability::metrics;

/// Watches the dataset file and swaps in a new catalog snapshot when it changes.
pub struct DatasetWatcher {
    path: PathBuf,
    catalog: Arc<Catalog>,
}

impl DatasetWatcher {
    pub fn new(path: &Path, catalog: Arc<Catalog>) -> Self {
        Self {
            path: path.to_path_buf(),
            catalog,
        }
    }

    /// Start watching in notify's background thread.
    ///
    /// The parent directory is watched rather than the file itself, so a
    /// dataset replaced by rename keeps being tracked.
    ///
    /// The returned watcher must be kept alive; dropping it stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let catalog = self.catalog;
        let file_name = self.path.file_name().map(|name| name.to_os_string());
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_dataset = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().is_some() && p.file_name() == file_name.as_deref());
                    if touches_dataset && (event.kind.is_modify() || event.kind.is_create()) {
                        tracing::info!(path = ?path, "Dataset change detected, reloading");
                        reload_from(&path, &catalog);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, directory = ?directory, "Dataset watcher started");
        Ok(watcher)
    }
}

/// Load `path` and swap it into `catalog`. A file that fails to load or
/// validate leaves the current snapshot in place.
pub fn reload_from(path: &Path, catalog: &Catalog) -> bool {
    match Dataset::load(path) {
        Ok(dataset) => {
            catalog.reload(dataset);
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload dataset. Keeping current catalog.");
            metrics::record_dataset_reload(false);
            false
        }
    }
}
