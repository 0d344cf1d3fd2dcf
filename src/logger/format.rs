//! Access log format module
//!
//! Supports two formats:
//! - `plain`: `[time] Serving `file:///...` (N bytes)`, or
//!   `[time] Failed to serve `file:///...` (500)` when the read failed
//! - `common`: Common Log Format (CLF) line keyed by request path

use chrono::Local;
use std::path::Path;

/// One served (or failed) file request
#[derive(Debug, Clone)]
pub struct ServeLogEntry {
    /// Client address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method
    pub method: String,
    /// Request URI path
    pub path: String,
    /// `file://` URI of the file that was read
    pub file_uri: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
}

impl ServeLogEntry {
    /// Create a new entry with current timestamp
    pub fn new(method: &str, path: &str, file: &Path, status: u16) -> Self {
        Self {
            remote_addr: "-".to_string(),
            time: Local::now(),
            method: method.to_string(),
            path: path.to_string(),
            file_uri: file_uri(file),
            status,
            body_bytes: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            _ => self.format_plain(),
        }
    }

    fn format_plain(&self) -> String {
        let time = self.time.format("%a %b %d %H:%M:%S %Z %Y");
        if self.status == 200 {
            format!("[{time}] Serving `{}` ({} bytes)", self.file_uri, self.body_bytes)
        } else {
            format!("[{time}] Failed to serve `{}` ({})", self.file_uri, self.status)
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }
}

/// `file://` URI for a path, made absolute against the working directory
pub fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let rendered = absolute.to_string_lossy().replace('\\', "/");
    if rendered.starts_with('/') {
        format!("file://{rendered}")
    } else {
        format!("file:///{rendered}")
    }
}
