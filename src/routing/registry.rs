//! Route registry
//!
//! Owns the known-path set and the route table as one unit. The registrar
//! task is the only writer; connection tasks only look routes up.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::DuplicateRouteError;
use crate::scanner::{RelativePath, ScannedFile};

/// Outcome of registering one scanned file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// New route created
    Created,
    /// Route already bound to this same file
    Unchanged,
}

#[derive(Debug, Default)]
struct RouteTable {
    /// Discovery order; never shrinks
    known: Vec<RelativePath>,
    /// URL path -> bound file, one entry per `known` entry
    routes: HashMap<String, PathBuf>,
    /// Fixed bindings installed at startup, outside the scan cycle
    aliases: HashMap<String, PathBuf>,
}

impl RouteTable {
    fn register(&mut self, file: &ScannedFile) -> Result<Registration, DuplicateRouteError> {
        let url = file.relative.url();
        if let Some(existing) = self.routes.get(&url) {
            if existing == &file.path {
                return Ok(Registration::Unchanged);
            }
            return Err(DuplicateRouteError {
                url,
                existing: existing.clone(),
                rejected: file.path.clone(),
            });
        }

        // Both halves change under the same write guard
        self.routes.insert(url, file.path.clone());
        self.known.push(file.relative.clone());
        Ok(Registration::Created)
    }
}

#[derive(Debug, Default)]
pub struct RouteRegistry {
    table: RwLock<RouteTable>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with fixed URL -> file bindings
    pub fn with_aliases<I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let table = RouteTable {
            aliases: aliases.into_iter().collect(),
            ..RouteTable::default()
        };
        Self {
            table: RwLock::new(table),
        }
    }

    /// Whether a scanned path already has a route
    pub async fn is_routed(&self, relative: &RelativePath) -> bool {
        self.table.read().await.routes.contains_key(&relative.url())
    }

    /// Resolve a request path to the bound file. Aliases win over scanned routes.
    pub async fn lookup(&self, url: &str) -> Option<PathBuf> {
        let table = self.table.read().await;
        table
            .aliases
            .get(url)
            .or_else(|| table.routes.get(url))
            .cloned()
    }

    /// Register a single scanned file
    pub async fn register(&self, file: &ScannedFile) -> Result<Registration, DuplicateRouteError> {
        self.table.write().await.register(file)
    }

    /// Register a batch under one write guard; results line up with `files`
    pub async fn register_all(
        &self,
        files: &[ScannedFile],
    ) -> Vec<Result<Registration, DuplicateRouteError>> {
        let mut table = self.table.write().await;
        files.iter().map(|file| table.register(file)).collect()
    }

    /// Snapshot of the known-path set in discovery order
    pub async fn known_paths(&self) -> Vec<RelativePath> {
        self.table.read().await.known.clone()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.known.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Fixed binding for `url`, if one was installed
    pub async fn alias(&self, url: &str) -> Option<PathBuf> {
        self.table.read().await.aliases.get(url).cloned()
    }
}

/// Build alias bindings for a root: keys get a leading `/`, targets are
/// resolved below `root`. Entries whose target normalizes to nothing are
/// skipped.
pub fn resolve_aliases<'a, I>(root: &Path, aliases: I) -> Vec<(String, PathBuf)>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    aliases
        .into_iter()
        .filter_map(|(url, target)| {
            let target = RelativePath::normalize(target)?;
            let url = if url.starts_with('/') {
                url.clone()
            } else {
                format!("/{url}")
            };
            Some((url, root.join(target.to_native())))
        })
        .collect()
}
