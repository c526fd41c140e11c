//! Shopfacet Core Library
//!
//! Core functionality for the Shopfacet marketplace search engine.
//! This library builds full-text product queries against an
//! Elasticsearch-compatible document store and derives category, brand and
//! specification facets from the aggregation results.

pub mod config;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod search;
pub mod spec;
pub mod types;

// Re-export commonly used types
pub use config::{SearchConfig, ShopfacetConfig};
pub use engine::{DocumentStore, SearchResponse, SearchSource};
pub use error::{ErrorCategory, Result, ShopfacetError};
pub use lookup::{BrandLookup, CategoryLookup, SpecSchemaSource};
pub use search::{calculate_interval, SearchService};
pub use spec::{SpecParam, SpecParams};
pub use types::{Brand, CategoryFacet, Goods, SearchRequest, SearchResult, SpecFacet};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
