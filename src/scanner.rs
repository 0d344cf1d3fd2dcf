//! Tree scanner
//!
//! Enumerates every regular file below a root directory and names each one
//! by its `/`-separated path relative to that root. Traversal goes through
//! `walkdir` with link following off: symlinks to files are reported,
//! symlinks to directories are not descended, so link cycles cannot loop.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScanError;

/// File location relative to the served root, always `/`-separated
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Normalize a raw relative path: `\` becomes `/`, empty segments vanish.
    /// Returns `None` when nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let segments: Vec<&str> = raw
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments.join("/")))
        }
    }

    /// Build from a path already relative to the root.
    ///
    /// `None` for paths leaving the root and for names that are not UTF-8.
    pub fn from_path(relative: &Path) -> Option<Self> {
        let mut joined = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    if !joined.is_empty() {
                        joined.push('/');
                    }
                    joined.push_str(part.to_str()?);
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        Self::normalize(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL path the file is routed under
    pub fn url(&self) -> String {
        format!("/{}", self.0)
    }

    /// Same path using the host separator
    pub fn to_native(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A discovered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub relative: RelativePath,
    /// Path on disk as found by the walk (root joined with the entry)
    pub path: PathBuf,
}

/// Result of one walk: whatever could be read, plus what could not
#[derive(Debug, Default)]
pub struct Scan {
    pub files: Vec<ScannedFile>,
    pub errors: Vec<ScanError>,
    /// Files whose name cannot be turned into a URL (not UTF-8)
    pub skipped: Vec<PathBuf>,
}

impl Scan {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walk `root` and collect every regular file beneath it.
///
/// Unreadable directories or entries are recorded in `Scan::errors` and the
/// walk carries on with the rest of the tree. Sibling order is whatever the
/// filesystem returns.
pub fn scan(root: &Path) -> Scan {
    let mut result = Scan::default();

    for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                result.errors.push(ScanError {
                    path,
                    source: io::Error::from(err),
                });
                continue;
            }
        };

        let file_type = entry.file_type();
        // Dangling links resolve to an error and are skipped
        let is_file = if file_type.is_symlink() {
            fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file())
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }

        let path = entry.into_path();
        let Ok(stripped) = path.strip_prefix(root) else {
            continue;
        };
        match RelativePath::from_path(stripped) {
            Some(relative) => result.files.push(ScannedFile { relative, path }),
            None => result.skipped.push(path),
        }
    }

    result
}
