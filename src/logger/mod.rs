//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Route discovery logging
//! - Access logging for served files
//! - Error and warning logging, optionally to files

mod format;
pub mod writer;

pub use format::{file_uri, ServeLogEntry};
pub use writer::Level;

use crate::config::Config;
use crate::error::{DuplicateRouteError, FileAccessError, ScanError};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write at a level, falling back to stdout/stderr before `init`
fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level >= Level::Warn => eprintln!("{message}"),
        None if level >= Level::Info => println!("{message}"),
        None => {}
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Static server started successfully");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Serving: {}", config.site.root.display()));
    log_info(&format!(
        "Scan interval: {} ms{}",
        config.site.scan_interval_ms,
        if config.site.watch { " (+ filesystem watch)" } else { "" }
    ));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================\n");
}

pub fn log_route_created(url: &str) {
    log_info(&format!("Creating context `{url}`..."));
}

pub fn log_alias(url: &str, target: &std::path::Path) {
    log_info(&format!("Alias `{url}` -> {}", target.display()));
}

pub fn log_scan_error(err: &ScanError) {
    log_warning(&format!("[Scan] {err}"));
}

pub fn log_duplicate_route(err: &DuplicateRouteError) {
    log_warning(&format!("[Route] {err}"));
}

pub fn log_unroutable_name(path: &std::path::Path) {
    log_warning(&format!(
        "[Scan] Skipping '{}': file name is not valid UTF-8",
        path.display()
    ));
}

pub fn log_file_access_error(err: &FileAccessError) {
    log_error(&format!("[Serve] {err}"));
}

/// Log a served file in the configured access log format
pub fn log_access(entry: &ServeLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}
