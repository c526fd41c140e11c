//! Product search and faceting
//!
//! [`SearchService`] is the entry point. It runs the primary full-text
//! query with category and brand aggregations, resolves those into facets,
//! and, when the hits fall into exactly one category, computes that
//! category's specification facets.

use crate::{error::Result, ShopfacetError};
use std::{future::Future, time::Duration};

pub mod assembler;
pub mod facets;
pub mod interval;
pub mod service;
pub mod spec_facets;

pub use assembler::{assemble, PageSlice};
pub use facets::FacetResolver;
pub use interval::calculate_interval;
pub use service::SearchService;
pub use spec_facets::{NumericLayout, SpecFacetEngine};

/// Await `future`, failing with a timeout error once `limit` elapses
pub(crate) async fn bounded<T, F>(operation: &str, limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(ShopfacetError::timeout(operation)),
    }
}
