//! Document store protocol
//!
//! The search engine is consumed through the [`DocumentStore`] trait: one
//! call per round trip, taking a fully built [`SearchSource`] and returning
//! the decoded [`SearchResponse`]. Field names of the goods index live here
//! so query builders and tests agree on them.

use crate::error::Result;
use async_trait::async_trait;

pub mod aggregation;
pub mod query;

pub use aggregation::{
    AggregationResult, Aggregations, HistogramBucket, SearchResponse, Stats, TermsBucket,
};
pub use query::{
    Aggregation, AggregationKind, Operator, Query, SearchSource, Sort, SortOrder, SourceFilter,
};

/// Composite full-text field
pub const FIELD_ALL: &str = "all";
/// Third-level category id
pub const FIELD_CATEGORY: &str = "cid3";
/// Brand id
pub const FIELD_BRAND: &str = "brandId";
/// Namespace of the dynamic specification fields
pub const SPECS_PREFIX: &str = "specs";
/// Fields projected back for every hit
pub const PROJECTED_FIELDS: [&str; 3] = ["id", "skus", "subTitle"];

/// Numeric specification field, e.g. `specs.weight`
pub fn spec_field(key: &str) -> String {
    format!("{}.{}", SPECS_PREFIX, key)
}

/// Unanalyzed variant of a specification field, e.g. `specs.color.keyword`
pub fn spec_keyword_field(key: &str) -> String {
    format!("{}.{}.keyword", SPECS_PREFIX, key)
}

/// Read-only access to the goods index
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute one search round trip
    async fn search(&self, source: &SearchSource) -> Result<SearchResponse>;
}
