//! Specification facets
//!
//! Once a search narrows to a single category, its searchable specification
//! parameters become facets. This takes two dependent round trips:
//!
//! 1. a stats aggregation per numeric parameter, restricted to the category,
//!    yields min/max/sum from which each histogram interval is derived;
//! 2. the base query is re-run with one histogram per numeric parameter
//!    (using those intervals) and one terms aggregation per text parameter.
//!
//! A parameter missing from either response simply gets no options.

use crate::{
    engine::{
        spec_field, spec_keyword_field, Aggregation, Aggregations, DocumentStore, Query,
        SearchSource, Stats, FIELD_CATEGORY,
    },
    error::Result,
    search::{
        bounded,
        interval::{calculate_interval, range_label, round_to, single_value_label},
    },
    spec::{SpecMetadataResolver, SpecParam, SpecParams},
    types::SpecFacet,
};
use indexmap::IndexMap;
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// Histogram buckets below this document count are not returned
const MIN_BUCKET_DOCS: u64 = 1;

/// Smallest width a histogram is ever requested with
const MIN_INTERVAL: f64 = 0.01;

/// Width used to check that a single-valued parameter occurs in the hits
const SINGLE_VALUE_INTERVAL: f64 = 1.0;

/// How a numeric parameter is bucketed, decided from its stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericLayout {
    /// Fixed-width ranges
    Histogram { interval: f64 },
    /// Every value in the category is the same; one option labeled with
    /// that value, offered only if the hits carry it
    Single { value: f64 },
    /// No document carries the parameter
    Empty,
}

impl NumericLayout {
    /// Layout for a parameter given its stats, if any came back
    pub fn from_stats(stats: Option<&Stats>) -> Self {
        let (min, max) = match stats {
            Some(Stats {
                count,
                min: Some(min),
                max: Some(max),
                ..
            }) if *count > 0 => (*min, *max),
            _ => return Self::Empty,
        };
        let sum = stats.map(|s| s.sum).unwrap_or_default();

        if min == max {
            return Self::Single { value: min };
        }

        let interval = calculate_interval(min, max, sum);
        if interval > 0.0 {
            return Self::Histogram { interval };
        }

        // Narrow ranges snap to zero; fall back to the unsnapped width,
        // never below one hundredth so labels stay distinct.
        let raw = (max - min) / super::interval::TARGET_BUCKETS;
        Self::Histogram {
            interval: round_to(raw, 2).max(MIN_INTERVAL),
        }
    }
}

/// Computes specification facets for a single category
#[derive(Clone)]
pub struct SpecFacetEngine {
    store: Arc<dyn DocumentStore>,
    metadata: SpecMetadataResolver,
    timeout: Duration,
}

impl SpecFacetEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        metadata: SpecMetadataResolver,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            metadata,
            timeout,
        }
    }

    /// Facets for every searchable parameter of the category, numeric first
    pub async fn compute(&self, category_id: i64, base_query: &Query) -> Result<Vec<SpecFacet>> {
        let params = self.metadata.resolve(category_id).await?;
        if params.is_empty() {
            debug!("Category {} has no searchable parameters", category_id);
            return Ok(Vec::new());
        }

        let layouts = self.numeric_layouts(category_id, &params).await?;
        let aggregations = self.facet_aggregations(base_query, &params, &layouts).await?;

        Ok(build_facets(&params, &layouts, &aggregations))
    }

    /// Phase one: per-parameter stats restricted to the category
    async fn numeric_layouts(
        &self,
        category_id: i64,
        params: &SpecParams,
    ) -> Result<IndexMap<String, NumericLayout>> {
        if params.numeric.is_empty() {
            return Ok(IndexMap::new());
        }

        let source = params.numeric.keys().fold(
            SearchSource::aggregations_only(Query::term(FIELD_CATEGORY, category_id)),
            |source, key| source.with_aggregation(key.as_str(), Aggregation::stats(spec_field(key))),
        );

        let response = bounded(
            "specification stats aggregation",
            self.timeout,
            self.store.search(&source),
        )
        .await?;

        Ok(params
            .numeric
            .keys()
            .map(|key| {
                let layout = NumericLayout::from_stats(response.aggregations.stats(key));
                debug!("Numeric parameter '{}' laid out as {:?}", key, layout);
                (key.clone(), layout)
            })
            .collect())
    }

    /// Phase two: histograms and terms over the base query
    async fn facet_aggregations(
        &self,
        base_query: &Query,
        params: &SpecParams,
        layouts: &IndexMap<String, NumericLayout>,
    ) -> Result<Aggregations> {
        let mut source = SearchSource::aggregations_only(base_query.clone());

        for (key, layout) in layouts {
            let interval = match layout {
                NumericLayout::Histogram { interval } => *interval,
                NumericLayout::Single { .. } => SINGLE_VALUE_INTERVAL,
                NumericLayout::Empty => continue,
            };
            source = source.with_aggregation(
                key.as_str(),
                Aggregation::histogram(spec_field(key), interval, MIN_BUCKET_DOCS),
            );
        }
        for key in &params.text {
            source = source.with_aggregation(key.as_str(), Aggregation::terms(spec_keyword_field(key)));
        }

        if source.aggregations.is_empty() {
            return Ok(Aggregations::new());
        }

        let response = bounded(
            "specification facet aggregation",
            self.timeout,
            self.store.search(&source),
        )
        .await?;
        Ok(response.aggregations)
    }
}

/// Assemble descriptors in schema order, numeric parameters first
///
/// Every option comes from a non-empty bucket of the facet round trip.
pub fn build_facets(
    params: &SpecParams,
    layouts: &IndexMap<String, NumericLayout>,
    aggregations: &Aggregations,
) -> Vec<SpecFacet> {
    params
        .iter()
        .map(|param| match param {
            SpecParam::Numeric { key, unit } => {
                let buckets = aggregations
                    .histogram(&key)
                    .unwrap_or_default()
                    .iter()
                    .filter(|bucket| bucket.doc_count >= MIN_BUCKET_DOCS);
                let options = match layouts.get(&key).copied().unwrap_or(NumericLayout::Empty) {
                    NumericLayout::Histogram { interval } => buckets
                        .map(|bucket| range_label(bucket.key, interval))
                        .collect(),
                    NumericLayout::Single { value } => buckets
                        .take(1)
                        .map(|_| single_value_label(value))
                        .collect(),
                    NumericLayout::Empty => Vec::new(),
                };
                SpecFacet::numeric(key, unit, options)
            }
            SpecParam::Text { key } => {
                let options = aggregations
                    .terms(&key)
                    .unwrap_or_default()
                    .iter()
                    .filter(|bucket| bucket.doc_count > 0)
                    .map(|bucket| bucket.key.clone())
                    .collect();
                SpecFacet::text(key, options)
            }
        })
        .collect()
}
