//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! lookup in the registry and dispatch to the file handler. Routes are keyed
//! by file name, so the URI path is percent-decoded before lookup.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub is_head: bool,
    pub remote_addr: SocketAddr,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();

    logger::log_debug(&format!(
        "[Request] {method} {} {:?}",
        req.uri(),
        req.version()
    ));

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    // Escapes that do not decode to UTF-8 can never name a routed file
    let Ok(path) = percent_decode_str(req.uri().path()).decode_utf8() else {
        logger::log_debug(&format!("[Request] Undecodable path {}", req.uri().path()));
        return Ok(http::build_404_response());
    };

    let ctx = RequestContext {
        method,
        path: &path,
        is_head: *method == Method::HEAD,
        remote_addr,
    };

    // 2. Look up the route and dispatch
    Ok(route_request(&ctx, &state).await)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request through the registry; unknown paths get a 404
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    // Read guard is released before the file is touched
    let Some(file) = state.registry.lookup(ctx.path).await else {
        logger::log_debug(&format!("[Request] No route for {}", ctx.path));
        return http::build_404_response();
    };

    static_files::serve_file(ctx, &file, state).await
}
