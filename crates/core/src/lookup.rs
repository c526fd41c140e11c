//! Read-only peer lookup services
//!
//! Category names, brand entities and specification schemas are owned by
//! the item service. The search side only ever reads them.

use crate::{error::Result, types::Brand};
use async_trait::async_trait;

/// Category name lookup
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    /// Names for the given ids, positionally aligned with the input
    async fn names_by_ids(&self, ids: &[i64]) -> Result<Vec<String>>;
}

/// Brand entity lookup
#[async_trait]
pub trait BrandLookup: Send + Sync {
    /// Brands for the given ids; ids without a brand are simply absent
    async fn brands_by_ids(&self, ids: &[i64]) -> Result<Vec<Brand>>;
}

/// Specification schema lookup
#[async_trait]
pub trait SpecSchemaSource: Send + Sync {
    /// Serialized specification groups of a category
    async fn schema_by_category_id(&self, category_id: i64) -> Result<String>;
}
