//! Route registrar
//!
//! Periodically scans the served root and registers a route for every file
//! that does not have one yet. First cycle runs immediately at startup.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use super::registry::{Registration, RouteRegistry};
use super::watcher::TreeWatcher;
use crate::logger;
use crate::scanner::{self, RelativePath};

/// Shortest accepted scan period
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// What a single scan cycle changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Paths that received a route in this cycle
    pub discovered: Vec<RelativePath>,
    /// Files dropped because their URL was taken by another file
    pub duplicates: usize,
    /// Directories or entries the scan could not read
    pub scan_errors: usize,
    /// Files left unrouted because their name is not UTF-8
    pub skipped: usize,
}

pub struct Registrar {
    root: PathBuf,
    interval: Duration,
    watch: bool,
    registry: Arc<RouteRegistry>,
    /// Conflicting or unroutable files already reported, so each is warned
    /// about once
    rejected: HashSet<PathBuf>,
}

impl Registrar {
    pub fn new(root: PathBuf, interval: Duration, registry: Arc<RouteRegistry>) -> Self {
        Self {
            root,
            interval: interval.max(MIN_INTERVAL),
            watch: false,
            registry,
            rejected: HashSet::new(),
        }
    }

    /// Also wake up on filesystem events, on top of the fixed period
    #[must_use]
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Scan once and register whatever is new.
    ///
    /// Scan errors are logged and whatever part of the tree was readable is
    /// still registered. Routes registered earlier are never touched.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let root = self.root.clone();
        let scan = match tokio::task::spawn_blocking(move || scanner::scan(&root)).await {
            Ok(scan) => scan,
            Err(e) => {
                logger::log_error(&format!("Scan task failed: {e}"));
                return CycleReport::default();
            }
        };

        let mut report = CycleReport {
            scan_errors: scan.errors.len(),
            skipped: scan.skipped.len(),
            ..CycleReport::default()
        };
        for err in &scan.errors {
            logger::log_scan_error(err);
        }
        for path in scan.skipped {
            if !self.rejected.contains(&path) {
                logger::log_unroutable_name(&path);
                self.rejected.insert(path);
            }
        }

        let results = self.registry.register_all(&scan.files).await;
        for (file, result) in scan.files.iter().zip(results) {
            match result {
                Ok(Registration::Created) => {
                    logger::log_route_created(&file.relative.url());
                    report.discovered.push(file.relative.clone());
                }
                Ok(Registration::Unchanged) => {}
                Err(dup) => {
                    report.duplicates += 1;
                    if self.rejected.insert(dup.rejected.clone()) {
                        logger::log_duplicate_route(&dup);
                    }
                }
            }
        }

        if !report.discovered.is_empty() || report.scan_errors > 0 {
            logger::log_debug(&format!(
                "[Scan] {} new, {} duplicate, {} unreadable",
                report.discovered.len(),
                report.duplicates,
                report.scan_errors
            ));
        }
        report
    }

    /// Run cycles forever. Never returns.
    #[allow(clippy::ignored_unit_patterns)]
    pub async fn run(mut self) {
        let wake = Arc::new(Notify::new());

        // Held for the lifetime of the loop; dropping it stops the watch
        let _watcher = if self.watch {
            match TreeWatcher::new(&self.root, Arc::clone(&wake)).run() {
                Ok(watcher) => {
                    logger::log_info(&format!(
                        "[Watch] Watching {} for changes",
                        self.root.display()
                    ));
                    Some(watcher)
                }
                Err(e) => {
                    logger::log_warning(&format!(
                        "Filesystem watch unavailable, polling only: {e}"
                    ));
                    None
                }
            }
        } else {
            None
        };

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = wake.notified() => {}
            }
            self.run_cycle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn registrar(root: &std::path::Path, registry: &Arc<RouteRegistry>) -> Registrar {
        Registrar::new(
            root.to_path_buf(),
            Duration::from_secs(1),
            Arc::clone(registry),
        )
    }

    fn names(paths: &[RelativePath]) -> Vec<String> {
        let mut names: Vec<String> = paths.iter().map(|p| p.as_str().to_string()).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_first_cycle_routes_every_file() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("index.html"), vec![b'x'; 500]).unwrap();
        fs::create_dir(root.path().join("assets")).unwrap();
        fs::write(root.path().join("assets/style.css"), vec![b'y'; 120]).unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(root.path(), &registry);
        let report = registrar.run_cycle().await;

        assert_eq!(names(&report.discovered), vec!["assets/style.css", "index.html"]);
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.scan_errors, 0);
        assert_eq!(
            registry.lookup("/assets/style.css").await,
            Some(root.path().join("assets").join("style.css"))
        );
        assert_eq!(
            registry.lookup("/index.html").await,
            Some(root.path().join("index.html"))
        );
    }

    #[tokio::test]
    async fn test_repeated_cycles_are_idempotent() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("a.txt"), b"a").unwrap();
        fs::write(root.path().join("b.txt"), b"b").unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(root.path(), &registry);
        registrar.run_cycle().await;
        let after_first = registry.known_paths().await;

        for _ in 0..4 {
            let report = registrar.run_cycle().await;
            assert!(report.discovered.is_empty());
        }
        assert_eq!(registry.known_paths().await, after_first);
    }

    #[tokio::test]
    async fn test_new_file_found_on_next_cycle() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("assets")).unwrap();
        fs::write(root.path().join("assets/style.css"), b"body{}").unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(root.path(), &registry);
        registrar.run_cycle().await;
        assert_eq!(registry.lookup("/assets/new.js").await, None);

        fs::write(root.path().join("assets/new.js"), b"0123456789").unwrap();
        let report = registrar.run_cycle().await;
        assert_eq!(names(&report.discovered), vec!["assets/new.js"]);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_deleted_file_stays_known() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("keep.txt"), b"k").unwrap();
        fs::write(root.path().join("drop.txt"), b"d").unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(root.path(), &registry);
        registrar.run_cycle().await;

        fs::remove_file(root.path().join("drop.txt")).unwrap();
        registrar.run_cycle().await;

        assert_eq!(registry.len().await, 2);
        assert!(registry.lookup("/drop.txt").await.is_some());
    }

    #[tokio::test]
    async fn test_missing_root_is_not_fatal() {
        let root = tempfile::tempdir().unwrap();
        let served = root.path().join("www");

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(&served, &registry);
        let report = registrar.run_cycle().await;
        assert_eq!(report.scan_errors, 1);
        assert!(registry.is_empty().await);

        fs::create_dir(&served).unwrap();
        fs::write(served.join("late.txt"), b"late").unwrap();
        let report = registrar.run_cycle().await;
        assert_eq!(report.scan_errors, 0);
        assert_eq!(names(&report.discovered), vec!["late.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_subtree_does_not_block_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let locked = root.path().join("private");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"h").unwrap();
        fs::create_dir(root.path().join("assets")).unwrap();
        fs::write(root.path().join("assets/app.js"), b"js").unwrap();
        fs::write(root.path().join("index.html"), b"<html></html>").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Permission bits do not bind a privileged user
        let readable = fs::read_dir(&locked).is_ok();

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(root.path(), &registry);
        let report = registrar.run_cycle().await;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert!(report.scan_errors >= 1);
        assert_eq!(names(&report.discovered), vec!["assets/app.js", "index.html"]);
        assert!(registry.lookup("/private/hidden.txt").await.is_none());

        // Once readable again the subtree is picked up
        let report = registrar.run_cycle().await;
        assert_eq!(report.scan_errors, 0);
        assert_eq!(names(&report.discovered), vec!["private/hidden.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_name_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(OsStr::from_bytes(b"caf\xe9.txt")), b"c").unwrap();
        fs::write(root.path().join("menu.txt"), b"m").unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(root.path(), &registry);
        let report = registrar.run_cycle().await;
        assert_eq!(names(&report.discovered), vec!["menu.txt"]);
        assert_eq!(report.skipped, 1);
        assert_eq!(registry.len().await, 1);
        assert!(registry.lookup("/caf\u{fffd}.txt").await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_separator_variants_share_one_route() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a/b")).unwrap();
        fs::write(root.path().join("a/b/c.txt"), b"nested").unwrap();
        // A literal backslash name normalizes to the same URL
        fs::write(root.path().join("a\\b\\c.txt"), b"flat").unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let mut registrar = registrar(root.path(), &registry);
        let report = registrar.run_cycle().await;

        assert_eq!(names(&report.discovered), vec!["a/b/c.txt"]);
        assert_eq!(report.duplicates, 1);
        assert_eq!(registry.len().await, 1);

        let report = registrar.run_cycle().await;
        assert!(report.discovered.is_empty());
        assert_eq!(report.duplicates, 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_run_fires_immediately() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("index.html"), b"<html></html>").unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let registrar = Registrar::new(
            root.path().to_path_buf(),
            Duration::from_secs(60),
            Arc::clone(&registry),
        );
        let task = tokio::spawn(registrar.run());

        let mut routed = false;
        for _ in 0..50 {
            if registry.lookup("/index.html").await.is_some() {
                routed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        task.abort();
        assert!(routed, "first cycle should not wait a full period");
    }

    #[tokio::test]
    async fn test_run_picks_up_files_within_one_period() {
        let root = tempfile::tempdir().unwrap();

        let registry = Arc::new(RouteRegistry::new());
        let registrar = Registrar::new(
            root.path().to_path_buf(),
            Duration::from_millis(50),
            Arc::clone(&registry),
        );
        let task = tokio::spawn(registrar.run());

        tokio::time::sleep(Duration::from_millis(20)).await;
        fs::write(root.path().join("later.js"), b"0123456789").unwrap();

        let mut routed = false;
        for _ in 0..50 {
            if registry.lookup("/later.js").await.is_some() {
                routed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        task.abort();
        assert!(routed);
    }
}
