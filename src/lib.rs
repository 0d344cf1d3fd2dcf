//! Static file server that discovers new files while running.
//!
//! A registrar task rescans the served root on a fixed period and adds a
//! route for every file it has not seen before. Routes are never removed.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod scanner;
pub mod server;
