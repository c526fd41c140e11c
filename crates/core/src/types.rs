//! Common types used throughout Shopfacet

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page returned when the request does not name one
pub const DEFAULT_PAGE: i32 = 1;

/// A product search request
///
/// Built once and read through accessors; defaults are resolved at read
/// time, so an absent or negative page reads back as the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    key: String,
    #[serde(default)]
    page: Option<i32>,
    #[serde(default)]
    sort_by: Option<String>,
    #[serde(default)]
    descending: Option<bool>,
    #[serde(default)]
    filter: BTreeMap<String, String>,
}

impl SearchRequest {
    /// Create a request for the given search key
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Set the requested page (1-based)
    pub fn with_page(mut self, page: i32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sort by a single field
    pub fn with_sort<S: Into<String>>(mut self, field: S, descending: bool) -> Self {
        self.sort_by = Some(field.into());
        self.descending = Some(descending);
        self
    }

    /// Add an equality constraint
    pub fn with_filter<K: Into<String>, V: Into<String>>(mut self, field: K, value: V) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// The raw search key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the key carries no searchable text
    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty()
    }

    /// The resolved page, never below 1
    pub fn page(&self) -> i32 {
        self.page.unwrap_or(DEFAULT_PAGE).max(DEFAULT_PAGE)
    }

    /// The sort field, if one is set and non-blank
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by
            .as_deref()
            .map(str::trim)
            .filter(|field| !field.is_empty())
    }

    /// Sort direction; ascending unless explicitly descending
    pub fn descending(&self) -> bool {
        self.descending.unwrap_or(false)
    }

    /// Additional equality constraints
    pub fn filter(&self) -> &BTreeMap<String, String> {
        &self.filter
    }
}

/// Indexed product projection returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goods {
    pub id: i64,
    #[serde(default)]
    pub sub_title: Option<String>,
    /// SKU list, stored in the index as serialized JSON
    #[serde(default)]
    pub skus: Option<String>,
}

/// Category facet entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFacet {
    pub id: i64,
    pub name: String,
}

/// Brand entity as returned by the brand lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub letter: Option<String>,
}

/// One specification facet with its selectable options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecFacet {
    #[serde(rename = "k")]
    pub key: String,
    /// Unit of a numeric facet; absent for text facets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub options: Vec<String>,
}

impl SpecFacet {
    /// Facet over a numeric parameter
    pub fn numeric<S: Into<String>>(key: S, unit: Option<String>, options: Vec<String>) -> Self {
        Self {
            key: key.into(),
            unit,
            options,
        }
    }

    /// Facet over a text parameter
    pub fn text<S: Into<String>>(key: S, options: Vec<String>) -> Self {
        Self {
            key: key.into(),
            unit: None,
            options,
        }
    }
}

/// Paged search result with facets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub total: u64,
    #[serde(rename = "totalPage")]
    pub total_pages: u64,
    pub items: Vec<Goods>,
    pub categories: Vec<CategoryFacet>,
    pub brands: Vec<Brand>,
    pub specs: Vec<SpecFacet>,
}
