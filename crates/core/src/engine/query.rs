//! Query DSL for the document store
//!
//! A [`SearchSource`] is the complete body of one `_search` round trip:
//! the query, pagination, source projection, sort and the named
//! aggregations. Everything renders to the Elasticsearch JSON dialect via
//! `to_json`.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

/// Boolean operator applied between the terms of a full-text match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// A query clause
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Full-text match against an analyzed field
    Match {
        field: String,
        text: String,
        operator: Operator,
    },
    /// Exact value match
    Term { field: String, value: Value },
    /// Scored `must` clauses combined with non-scoring `filter` clauses
    Bool { must: Vec<Query>, filter: Vec<Query> },
}

impl Query {
    /// Full-text match requiring every term to be present
    pub fn match_all_terms<F: Into<String>, T: Into<String>>(field: F, text: T) -> Self {
        Self::Match {
            field: field.into(),
            text: text.into(),
            operator: Operator::And,
        }
    }

    /// Exact value match
    pub fn term<F: Into<String>, V: Into<Value>>(field: F, value: V) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Match {
                field,
                text,
                operator,
            } => json!({
                "match": {
                    field.as_str(): {
                        "query": text,
                        "operator": operator.as_str(),
                    }
                }
            }),
            Self::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            Self::Bool { must, filter } => {
                let mut clauses = Map::new();
                if !must.is_empty() {
                    clauses.insert(
                        "must".to_string(),
                        Value::Array(must.iter().map(Query::to_json).collect()),
                    );
                }
                if !filter.is_empty() {
                    clauses.insert(
                        "filter".to_string(),
                        Value::Array(filter.iter().map(Query::to_json).collect()),
                    );
                }
                json!({ "bool": clauses })
            }
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Single-field sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new<S: Into<String>>(field: S, descending: bool) -> Self {
        Self {
            field: field.into(),
            order: if descending {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            },
        }
    }

    fn to_json(&self) -> Value {
        let order = match self.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        json!({ self.field.as_str(): { "order": order } })
    }
}

/// Which stored fields come back with each hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFilter {
    /// Full documents
    All,
    /// Only the listed fields
    Includes(Vec<String>),
    /// No document bodies at all
    Disabled,
}

/// Kind of an aggregation, used to decode its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationKind {
    Terms,
    Stats,
    Histogram,
}

/// An aggregation request
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Bucket documents by exact field value
    Terms { field: String },
    /// Min/max/sum/count over a numeric field
    Stats { field: String },
    /// Fixed-width numeric buckets
    Histogram {
        field: String,
        interval: f64,
        min_doc_count: u64,
    },
}

impl Aggregation {
    pub fn terms<S: Into<String>>(field: S) -> Self {
        Self::Terms {
            field: field.into(),
        }
    }

    pub fn stats<S: Into<String>>(field: S) -> Self {
        Self::Stats {
            field: field.into(),
        }
    }

    /// Histogram that suppresses buckets with fewer than `min_doc_count` documents
    pub fn histogram<S: Into<String>>(field: S, interval: f64, min_doc_count: u64) -> Self {
        Self::Histogram {
            field: field.into(),
            interval,
            min_doc_count,
        }
    }

    pub fn kind(&self) -> AggregationKind {
        match self {
            Self::Terms { .. } => AggregationKind::Terms,
            Self::Stats { .. } => AggregationKind::Stats,
            Self::Histogram { .. } => AggregationKind::Histogram,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Terms { field } => json!({ "terms": { "field": field } }),
            Self::Stats { field } => json!({ "stats": { "field": field } }),
            Self::Histogram {
                field,
                interval,
                min_doc_count,
            } => json!({
                "histogram": {
                    "field": field,
                    "interval": interval,
                    "min_doc_count": min_doc_count,
                }
            }),
        }
    }
}

/// Body of one search round trip
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSource {
    pub query: Query,
    pub from: usize,
    pub size: usize,
    pub source: SourceFilter,
    pub sort: Option<Sort>,
    /// Named aggregations, in request order
    pub aggregations: IndexMap<String, Aggregation>,
}

impl SearchSource {
    /// A search returning the first ten full documents, no aggregations
    pub fn new(query: Query) -> Self {
        Self {
            query,
            from: 0,
            size: 10,
            source: SourceFilter::All,
            sort: None,
            aggregations: IndexMap::new(),
        }
    }

    /// Aggregation-only search: no documents come back
    pub fn aggregations_only(query: Query) -> Self {
        Self::new(query).with_size(0).with_source(SourceFilter::Disabled)
    }

    /// Page through hits using a zero-based page index
    pub fn with_page(mut self, page_index: usize, page_size: usize) -> Self {
        self.from = page_index * page_size;
        self.size = page_size;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_source(mut self, source: SourceFilter) -> Self {
        self.source = source;
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_aggregation<S: Into<String>>(mut self, name: S, aggregation: Aggregation) -> Self {
        self.aggregations.insert(name.into(), aggregation);
        self
    }

    /// Kind of the named aggregation, if it was requested
    pub fn aggregation_kind(&self, name: &str) -> Option<AggregationKind> {
        self.aggregations.get(name).map(Aggregation::kind)
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_json());
        body.insert("from".to_string(), json!(self.from));
        body.insert("size".to_string(), json!(self.size));

        match &self.source {
            SourceFilter::All => {}
            SourceFilter::Includes(fields) => {
                body.insert("_source".to_string(), json!({ "includes": fields }));
            }
            SourceFilter::Disabled => {
                body.insert("_source".to_string(), Value::Bool(false));
            }
        }

        if let Some(sort) = &self.sort {
            body.insert("sort".to_string(), json!([sort.to_json()]));
        }

        if !self.aggregations.is_empty() {
            let aggs: Map<String, Value> = self
                .aggregations
                .iter()
                .map(|(name, agg)| (name.clone(), agg.to_json()))
                .collect();
            body.insert("aggs".to_string(), Value::Object(aggs));
        }

        Value::Object(body)
    }
}
