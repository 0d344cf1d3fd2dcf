//! Filesystem watcher that wakes the registrar early.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Watches the served tree and pokes `wake` when entries appear or change.
pub struct TreeWatcher {
    root: PathBuf,
    wake: Arc<Notify>,
}

impl TreeWatcher {
    pub fn new(root: &Path, wake: Arc<Notify>) -> Self {
        Self {
            root: root.to_path_buf(),
            wake,
        }
    }

    /// Start watching in the background.
    ///
    /// The returned watcher must be kept alive; dropping it stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let wake = self.wake;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_create() || event.kind.is_modify() {
                        wake.notify_one();
                    }
                }
                Err(e) => logger::log_warning(&format!("Watch error: {e}")),
            },
            Config::default(),
        )?;

        watcher.watch(&self.root, RecursiveMode::Recursive)?;
        Ok(watcher)
    }
}
