//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer, plus the
//! function-per-request adapter that reuses the same router.

pub mod function;
mod handlers;
mod rate_limit;
mod server;

pub use function::{FunctionError, FunctionEvent, FunctionResponse};
pub use handlers::{ApiError, AppState};
pub use server::HttpServer;
