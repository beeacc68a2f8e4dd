//! HTTP request handlers organized by domain

pub mod ask;
pub mod dashboard;
pub mod status;

// Re-export all handlers for use in router
pub use ask::*;
pub use dashboard::*;
pub use status::*;
