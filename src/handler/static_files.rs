//! Static file serving module
//!
//! Reads a routed file in full and answers with its bytes.

use crate::config::AppState;
use crate::error::FileAccessError;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger::{self, ServeLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve the file bound to the matched route.
///
/// A read failure (file deleted or moved since it was routed) becomes a 500;
/// the route itself is left in place.
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    file: &Path,
    state: &AppState,
) -> Response<Full<Bytes>> {
    match load_file(file).await {
        Ok(data) => {
            log_served(ctx, file, state, 200, data.len());
            http::build_file_response(Bytes::from(data), ctx.is_head)
        }
        Err(err) => {
            logger::log_file_access_error(&err);
            log_served(ctx, file, state, 500, 0);
            http::build_500_response()
        }
    }
}

fn log_served(ctx: &RequestContext<'_>, file: &Path, state: &AppState, status: u16, bytes: usize) {
    if !state.access_log() {
        return;
    }
    let mut entry = ServeLogEntry::new(ctx.method.as_str(), ctx.path, file, status);
    entry.remote_addr = ctx.remote_addr.to_string();
    entry.body_bytes = bytes;
    logger::log_access(&entry, &state.config.logging.access_log_format);
}

/// Read a whole file
pub async fn load_file(file: &Path) -> Result<Vec<u8>, FileAccessError> {
    fs::read(file).await.map_err(|source| FileAccessError {
        path: file.to_path_buf(),
        source,
    })
}
