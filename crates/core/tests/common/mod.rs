//! Common test helpers: scripted document store and in-memory item service

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use shopfacet_core::{
    engine::{AggregationResult, Aggregations, HistogramBucket, Stats, TermsBucket},
    Brand, BrandLookup, CategoryLookup, DocumentStore, Goods, Result, SearchConfig,
    SearchResponse, SearchService, SearchSource, ShopfacetError, SpecSchemaSource,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

/// One scripted answer of the document store
pub enum Scripted {
    Respond(SearchResponse),
    Fail(String),
    Hang,
}

/// Document store answering from a queue and recording every request
#[derive(Default)]
pub struct ScriptedStore {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<SearchSource>>,
}

impl ScriptedStore {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<SearchSource> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn search(&self, source: &SearchSource) -> Result<SearchResponse> {
        self.requests.lock().push(source.clone());
        let next = self.script.lock().pop_front();
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ShopfacetError::engine(message)),
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(SearchResponse::default())
            }
            None => Err(ShopfacetError::engine("no scripted response left")),
        }
    }
}

/// In-memory item service covering all three lookups
#[derive(Default)]
pub struct FakeItemService {
    pub categories: HashMap<i64, String>,
    pub brands: HashMap<i64, Brand>,
    pub schemas: HashMap<i64, String>,
    pub fail_categories: bool,
    pub fail_brands: bool,
    /// Answer category lookups with known names only, dropping the rest
    pub truncate_categories: bool,
    schema_calls: AtomicUsize,
}

impl FakeItemService {
    pub fn with_category(mut self, id: i64, name: &str) -> Self {
        self.categories.insert(id, name.to_string());
        self
    }

    pub fn with_brand(mut self, id: i64, name: &str) -> Self {
        self.brands.insert(
            id,
            Brand {
                id,
                name: name.to_string(),
                image: None,
                letter: name.chars().next().map(|c| c.to_uppercase().to_string()),
            },
        );
        self
    }

    pub fn with_schema(mut self, category_id: i64, schema: &str) -> Self {
        self.schemas.insert(category_id, schema.to_string());
        self
    }

    pub fn failing_categories(mut self) -> Self {
        self.fail_categories = true;
        self
    }

    pub fn truncating_categories(mut self) -> Self {
        self.truncate_categories = true;
        self
    }

    pub fn failing_brands(mut self) -> Self {
        self.fail_brands = true;
        self
    }

    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryLookup for FakeItemService {
    async fn names_by_ids(&self, ids: &[i64]) -> Result<Vec<String>> {
        if self.fail_categories {
            return Err(ShopfacetError::lookup("category", "service unavailable"));
        }
        if self.truncate_categories {
            return Ok(ids
                .iter()
                .filter_map(|id| self.categories.get(id).cloned())
                .collect());
        }
        Ok(ids
            .iter()
            .map(|id| self.categories.get(id).cloned().unwrap_or_default())
            .collect())
    }
}

#[async_trait]
impl BrandLookup for FakeItemService {
    async fn brands_by_ids(&self, ids: &[i64]) -> Result<Vec<Brand>> {
        if self.fail_brands {
            return Err(ShopfacetError::lookup("brand", "service unavailable"));
        }
        Ok(ids.iter().filter_map(|id| self.brands.get(id).cloned()).collect())
    }
}

#[async_trait]
impl SpecSchemaSource for FakeItemService {
    async fn schema_by_category_id(&self, category_id: i64) -> Result<String> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.schemas
            .get(&category_id)
            .cloned()
            .ok_or_else(|| ShopfacetError::not_found(format!("schema for {}", category_id)))
    }
}

/// Search configuration with short timeouts for tests
pub fn test_config() -> SearchConfig {
    SearchConfig {
        page_size: 20,
        timeout_ms: 200,
        lookup_timeout_ms: 200,
    }
}

pub fn service(store: Arc<ScriptedStore>, items: Arc<FakeItemService>) -> SearchService {
    SearchService::new(store, items.clone(), items.clone(), items, test_config())
}

pub fn goods(id: i64) -> Goods {
    Goods {
        id,
        sub_title: Some(format!("goods {}", id)),
        skus: Some("[]".to_string()),
    }
}

/// Primary response with the given hits and category/brand id buckets
pub fn primary_response(total: u64, items: Vec<Goods>, categories: &[i64], brands: &[i64]) -> SearchResponse {
    let buckets = |ids: &[i64]| {
        AggregationResult::Terms(
            ids.iter()
                .enumerate()
                .map(|(i, id)| TermsBucket::new(id.to_string(), 100 - i as u64))
                .collect(),
        )
    };
    SearchResponse {
        total,
        items,
        aggregations: Aggregations::new()
            .with("category", buckets(categories))
            .with("brand", buckets(brands)),
    }
}

pub fn stats_response(entries: &[(&str, f64, f64, f64, u64)]) -> SearchResponse {
    let mut aggregations = Aggregations::new();
    for (name, min, max, sum, count) in entries {
        aggregations.insert(
            *name,
            AggregationResult::Stats(Stats {
                count: *count,
                min: Some(*min),
                max: Some(*max),
                sum: *sum,
            }),
        );
    }
    SearchResponse {
        aggregations,
        ..Default::default()
    }
}

pub fn histogram(keys: &[f64]) -> AggregationResult {
    AggregationResult::Histogram(
        keys.iter()
            .map(|key| HistogramBucket {
                key: *key,
                doc_count: 1,
            })
            .collect(),
    )
}

pub fn terms(keys: &[&str]) -> AggregationResult {
    AggregationResult::Terms(keys.iter().map(|key| TermsBucket::new(*key, 1)).collect())
}

pub const PHONE_SCHEMA: &str = r#"[
    {"group": "basic", "params": [
        {"k": "weight", "searchable": true, "numerical": true, "unit": "kg"},
        {"k": "color", "searchable": true, "numerical": false},
        {"k": "release year", "searchable": false, "numerical": true, "unit": "year"}
    ]}
]"#;
