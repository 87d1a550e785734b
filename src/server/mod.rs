//! HTTP server implementation
//!
//! Exposes the health, metrics and error endpoints and wraps every request
//! with request-id, timing and error-capture middleware.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;


pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;
