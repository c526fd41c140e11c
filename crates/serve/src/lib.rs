//! Shopfacet Serve Library
//!
//! HTTP interface exposing product search with category, brand and
//! specification facets.

pub mod handlers;
pub mod middleware;
pub mod server;

pub use handlers::{AppState, ApiError, ErrorResponse, HealthResponse, SearchParams};
pub use server::{create_app, ServerBuilder, ShopfacetServer};

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
