//! HTTP protocol layer module
//!
//! Response builders, decoupled from routing and file access.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_500_response, build_file_response,
    build_options_response,
};
