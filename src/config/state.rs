// Application state module
// Shared between the registrar task and every connection task

use std::sync::Arc;

use super::types::Config;
use crate::routing::RouteRegistry;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Written only by the registrar; connection tasks read it
    pub registry: Arc<RouteRegistry>,
}

impl AppState {
    pub fn new(config: Config, registry: Arc<RouteRegistry>) -> Self {
        Self { config, registry }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
