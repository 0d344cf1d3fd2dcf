//! Routing module
//!
//! Dynamic route discovery:
//! - Route registry shared by the registrar and the request handler
//! - Registrar that scans the served tree on a fixed period
//! - Optional filesystem watcher that triggers an early scan

mod registrar;
mod registry;
mod watcher;

pub use registrar::{CycleReport, Registrar};
pub use registry::{resolve_aliases, Registration, RouteRegistry};
pub use watcher::TreeWatcher;
