//! Typed aggregation results and search response decoding
//!
//! The engine answers every aggregation with a differently shaped JSON
//! object. Results are decoded using the [`AggregationKind`] of the
//! aggregation the caller requested under the same name, so a histogram is
//! always read as a histogram and never guessed from its payload.

use super::query::{AggregationKind, SearchSource};
use crate::{error::Result, types::Goods, ShopfacetError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One bucket of a terms aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct TermsBucket {
    /// Bucket key rendered as a string (numeric keys keep their digits)
    pub key: String,
    pub doc_count: u64,
}

impl TermsBucket {
    pub fn new<S: Into<String>>(key: S, doc_count: u64) -> Self {
        Self {
            key: key.into(),
            doc_count,
        }
    }
}

/// One bucket of a histogram aggregation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBucket {
    /// Lower bound of the bucket
    pub key: f64,
    pub doc_count: u64,
}

/// Result of a stats aggregation
///
/// `min` and `max` are absent when no document carried the field.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub sum: f64,
}

/// Decoded result of a single named aggregation
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationResult {
    Terms(Vec<TermsBucket>),
    Stats(Stats),
    Histogram(Vec<HistogramBucket>),
}

#[derive(Debug, Deserialize)]
struct RawBuckets<B> {
    #[serde(default = "Vec::new")]
    buckets: Vec<B>,
}

#[derive(Debug, Deserialize)]
struct RawTermsBucket {
    key: Value,
    #[serde(default)]
    key_as_string: Option<String>,
    #[serde(default)]
    doc_count: u64,
}

#[derive(Debug, Deserialize)]
struct RawHistogramBucket {
    key: f64,
    #[serde(default)]
    doc_count: u64,
}

impl AggregationResult {
    /// Decode a raw aggregation object as the given kind
    pub fn parse(kind: AggregationKind, raw: &Value) -> Result<Self> {
        match kind {
            AggregationKind::Terms => {
                let parsed: RawBuckets<RawTermsBucket> = serde_json::from_value(raw.clone())?;
                let buckets = parsed
                    .buckets
                    .into_iter()
                    .map(|bucket| {
                        let key = match (bucket.key_as_string, bucket.key) {
                            (Some(key), _) => key,
                            (None, Value::String(key)) => key,
                            (None, other) => other.to_string(),
                        };
                        TermsBucket {
                            key,
                            doc_count: bucket.doc_count,
                        }
                    })
                    .collect();
                Ok(Self::Terms(buckets))
            }
            AggregationKind::Stats => Ok(Self::Stats(serde_json::from_value(raw.clone())?)),
            AggregationKind::Histogram => {
                let parsed: RawBuckets<RawHistogramBucket> = serde_json::from_value(raw.clone())?;
                Ok(Self::Histogram(
                    parsed
                        .buckets
                        .into_iter()
                        .map(|bucket| HistogramBucket {
                            key: bucket.key,
                            doc_count: bucket.doc_count,
                        })
                        .collect(),
                ))
            }
        }
    }
}

/// Aggregation results keyed by the name they were requested under
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregations {
    results: HashMap<String, AggregationResult>,
}

impl Aggregations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, result: AggregationResult) {
        self.results.insert(name.into(), result);
    }

    pub fn with<S: Into<String>>(mut self, name: S, result: AggregationResult) -> Self {
        self.insert(name, result);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AggregationResult> {
        self.results.get(name)
    }

    /// Terms buckets of the named aggregation, if present and of that kind
    pub fn terms(&self, name: &str) -> Option<&[TermsBucket]> {
        match self.results.get(name) {
            Some(AggregationResult::Terms(buckets)) => Some(buckets),
            _ => None,
        }
    }

    pub fn stats(&self, name: &str) -> Option<&Stats> {
        match self.results.get(name) {
            Some(AggregationResult::Stats(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn histogram(&self, name: &str) -> Option<&[HistogramBucket]> {
        match self.results.get(name) {
            Some(AggregationResult::Histogram(buckets)) => Some(buckets),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Decoded answer to one [`SearchSource`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Total number of matching documents
    pub total: u64,
    /// Hits of the requested page
    pub items: Vec<Goods>,
    pub aggregations: Aggregations,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    hits: Option<RawHits>,
    #[serde(default)]
    aggregations: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// Engines report the hit total either as a number or as `{ "value": n }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

impl SearchResponse {
    /// Decode a raw engine response for the search that produced it
    pub fn from_engine_json(raw: Value, request: &SearchSource) -> Result<Self> {
        let parsed: RawResponse = serde_json::from_value(raw)?;

        let (total, items) = match parsed.hits {
            Some(hits) => {
                let total = match hits.total {
                    Some(RawTotal::Count(n)) | Some(RawTotal::Object { value: n }) => n,
                    None => 0,
                };
                let items = hits
                    .hits
                    .into_iter()
                    .filter_map(|hit| hit.source)
                    .map(serde_json::from_value::<Goods>)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                (total, items)
            }
            None => (0, Vec::new()),
        };

        let mut aggregations = Aggregations::new();
        for (name, raw) in parsed.aggregations.unwrap_or_default() {
            let kind = request.aggregation_kind(&name).ok_or_else(|| {
                ShopfacetError::engine(format!("Unexpected aggregation in response: {}", name))
            })?;
            aggregations.insert(name, AggregationResult::parse(kind, &raw)?);
        }

        Ok(Self {
            total,
            items,
            aggregations,
        })
    }
}
