//! README watcher for automatic rebuilds.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::config::DocsConfig;
use crate::docs::combine::combine_readmes;
use crate::docs::DocsError;

/// Rebuilds the combined document whenever a README under `app_dir` changes.
pub struct DocsWatcher {
    config: DocsConfig,
}

impl DocsWatcher {
    pub fn new(config: DocsConfig) -> Self {
        Self { config }
    }

    /// Combine once, then rebuild on every relevant change until `shutdown`
    /// fires. Returns the number of rebuilds after the initial one.
    ///
    /// A failing rebuild is logged and the watcher keeps going.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<usize, DocsError> {
        let app_dir = self.config.resolved_app_dir();
        let output = self.config.resolved_output();
        let debounce = Duration::from_millis(self.config.watch_debounce_ms);

        combine_readmes(&self.config)?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let file_name = self.config.file_name.clone();
        let ignored = output.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_relevant(&event, &file_name, &ignored) {
                        let _ = tx.send(event.paths);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&app_dir, RecursiveMode::Recursive)?;
        tracing::info!(path = %app_dir.display(), "Docs watcher started");

        let mut rebuilds = 0;
        loop {
            tokio::select! {
                changed = rx.recv() => {
                    let Some(paths) = changed else { break };
                    tracing::info!(?paths, "README change detected, rebuilding...");

                    // Let bursts of editor writes settle into one rebuild.
                    if !settle(debounce, &mut shutdown).await {
                        tracing::info!("Docs watcher received shutdown signal while debouncing");
                        break;
                    }
                    while rx.try_recv().is_ok() {}

                    match combine_readmes(&self.config) {
                        Ok(_) => rebuilds += 1,
                        Err(e) => tracing::error!("Rebuild failed: {}. Keeping previous output.", e),
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Docs watcher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
        Ok(rebuilds)
    }
}

/// Wait out the debounce window. False when shutdown fired first.
async fn settle(debounce: Duration, shutdown: &mut broadcast::Receiver<()>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(debounce) => true,
        _ = shutdown.recv() => false,
    }
}

/// True when `event` touches a file named `file_name` other than `output`.
pub fn is_relevant(event: &Event, file_name: &str, output: &Path) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.file_name().is_some_and(|name| name == file_name) && !is_output(path, output)
    })
}

fn is_output(path: &Path, output: &Path) -> bool {
    if path == output {
        return true;
    }
    // Event paths are absolute; the configured output may not be.
    let canonical = |p: &Path| -> Option<PathBuf> {
        match p.canonicalize() {
            Ok(c) => Some(c),
            Err(_) => {
                let name = p.file_name()?;
                p.parent()?.canonicalize().ok().map(|dir| dir.join(name))
            }
        }
    };
    matches!((canonical(path), canonical(output)), (Some(a), Some(b)) if a == b)
}
