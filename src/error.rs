//! Error taxonomy
//!
//! Only `StartupError` is fatal. Everything else is recovered where it
//! happens: logged, and the scan loop or the connection keeps running.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure before the server starts accepting connections.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("root directory '{}' does not exist or is not a directory", .0.display())]
    RootMissing(PathBuf),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: io::Error,
    },

    #[error("failed to open log file: {0}")]
    LogFile(io::Error),

    #[error("failed to build runtime: {0}")]
    Runtime(io::Error),
}

/// A directory or entry that could not be read during a scan cycle.
#[derive(Debug, Error)]
#[error("cannot read '{}': {source}", .path.display())]
pub struct ScanError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// A routed file that could not be read when a request arrived.
#[derive(Debug, Error)]
#[error("cannot read '{}': {source}", .path.display())]
pub struct FileAccessError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Two different files normalized to the same URL path.
#[derive(Debug, Error)]
#[error("route '{url}' already bound to '{}', dropping '{}'", .existing.display(), .rejected.display())]
pub struct DuplicateRouteError {
    pub url: String,
    pub existing: PathBuf,
    pub rejected: PathBuf,
}
