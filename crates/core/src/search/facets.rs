//! Category and brand facets
//!
//! Terms aggregations on `cid3` and `brandId` only yield ids. The resolver
//! turns them into display entities through the lookup services. Any
//! failure here degrades to an empty facet; the hits are still returned.

use crate::{
    engine::TermsBucket,
    error::Result,
    lookup::{BrandLookup, CategoryLookup},
    search::bounded,
    types::{Brand, CategoryFacet},
    ShopfacetError,
};
use indexmap::IndexSet;
use std::{sync::Arc, time::Duration};
use tracing::warn;

/// Resolves aggregation bucket ids into category and brand entities
#[derive(Clone)]
pub struct FacetResolver {
    categories: Arc<dyn CategoryLookup>,
    brands: Arc<dyn BrandLookup>,
    timeout: Duration,
}

impl FacetResolver {
    pub fn new(
        categories: Arc<dyn CategoryLookup>,
        brands: Arc<dyn BrandLookup>,
        timeout: Duration,
    ) -> Self {
        Self {
            categories,
            brands,
            timeout,
        }
    }

    /// Category facets in bucket order, empty on any failure
    pub async fn resolve_categories(&self, buckets: &[TermsBucket]) -> Vec<CategoryFacet> {
        match self.try_resolve_categories(buckets).await {
            Ok(categories) => categories,
            Err(e) => {
                warn!("Category facet resolution failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_resolve_categories(&self, buckets: &[TermsBucket]) -> Result<Vec<CategoryFacet>> {
        let ids = distinct_ids(buckets)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let names = bounded(
            "category lookup",
            self.timeout,
            self.categories.names_by_ids(&ids),
        )
        .await?;

        if names.len() != ids.len() {
            return Err(ShopfacetError::lookup(
                "category",
                format!("returned {} names for {} ids", names.len(), ids.len()),
            ));
        }

        Ok(ids
            .into_iter()
            .zip(names)
            .map(|(id, name)| CategoryFacet { id, name })
            .collect())
    }

    /// Brand facets; ids without a brand are absent, failures give an empty list
    pub async fn resolve_brands(&self, buckets: &[TermsBucket]) -> Vec<Brand> {
        match self.try_resolve_brands(buckets).await {
            Ok(brands) => brands,
            Err(e) => {
                warn!("Brand facet resolution failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_resolve_brands(&self, buckets: &[TermsBucket]) -> Result<Vec<Brand>> {
        let ids = distinct_ids(buckets)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        bounded("brand lookup", self.timeout, self.brands.brands_by_ids(&ids)).await
    }
}

/// Distinct numeric bucket keys, first occurrence wins
fn distinct_ids(buckets: &[TermsBucket]) -> Result<Vec<i64>> {
    let mut ids = IndexSet::with_capacity(buckets.len());
    for bucket in buckets {
        let id = bucket.key.parse::<i64>().map_err(|_| {
            ShopfacetError::engine(format!("Non-numeric id bucket: {}", bucket.key))
        })?;
        ids.insert(id);
    }
    Ok(ids.into_iter().collect())
}
