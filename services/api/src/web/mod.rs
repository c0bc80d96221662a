pub mod client_config;
pub mod essays;
pub mod middleware;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder so the binary and the tests share one application.
pub use router::app;
pub use middleware::require_reviewer;
