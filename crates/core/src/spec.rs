//! Specification metadata
//!
//! A category's specification schema arrives as serialized JSON: a list of
//! groups, each holding parameter definitions. Only searchable parameters
//! take part in faceting, and each of those is parsed once into a typed
//! [`SpecParam`].

use crate::{
    error::Result,
    lookup::SpecSchemaSource,
    search::bounded,
    ShopfacetError,
};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// A group of specification parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SpecGroup {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub params: Vec<SpecParamDef>,
}

/// Raw parameter definition as published by the metadata service
#[derive(Debug, Clone, Deserialize)]
pub struct SpecParamDef {
    #[serde(rename = "k", alias = "key")]
    pub key: String,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub numerical: bool,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A searchable specification parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecParam {
    Numeric { key: String, unit: Option<String> },
    Text { key: String },
}

impl SpecParam {
    pub fn key(&self) -> &str {
        match self {
            Self::Numeric { key, .. } | Self::Text { key } => key,
        }
    }
}

impl SpecParamDef {
    /// Typed parameter, or `None` when the parameter is not searchable
    pub fn to_param(&self) -> Option<SpecParam> {
        if !self.searchable {
            return None;
        }
        let key = self.key.clone();
        Some(if self.numerical {
            SpecParam::Numeric {
                key,
                unit: self.unit.clone().filter(|unit| !unit.is_empty()),
            }
        } else {
            SpecParam::Text { key }
        })
    }
}

/// Searchable parameters of one category, split by kind
///
/// Both collections keep schema order. A key appearing in several groups is
/// taken from its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecParams {
    /// Numeric keys and their units
    pub numeric: IndexMap<String, Option<String>>,
    /// Text keys
    pub text: IndexSet<String>,
}

impl SpecParams {
    pub fn from_groups(groups: &[SpecGroup]) -> Self {
        let mut params = Self::default();
        for param in groups
            .iter()
            .flat_map(|group| group.params.iter())
            .filter_map(SpecParamDef::to_param)
        {
            if params.contains(param.key()) {
                continue;
            }
            match param {
                SpecParam::Numeric { key, unit } => {
                    params.numeric.insert(key, unit);
                }
                SpecParam::Text { key } => {
                    params.text.insert(key);
                }
            }
        }
        params
    }

    pub fn contains(&self, key: &str) -> bool {
        self.numeric.contains_key(key) || self.text.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.text.is_empty()
    }

    /// All parameters, numeric first
    pub fn iter(&self) -> impl Iterator<Item = SpecParam> + '_ {
        self.numeric
            .iter()
            .map(|(key, unit)| SpecParam::Numeric {
                key: key.clone(),
                unit: unit.clone(),
            })
            .chain(self.text.iter().map(|key| SpecParam::Text { key: key.clone() }))
    }
}

/// Parse a serialized schema into its groups
pub fn parse_schema(raw: &str) -> Result<Vec<SpecGroup>> {
    serde_json::from_str(raw)
        .map_err(|e| ShopfacetError::metadata(format!("Invalid specification schema: {}", e)))
}

/// Fetches and parses category specification schemas
#[derive(Clone)]
pub struct SpecMetadataResolver {
    source: Arc<dyn SpecSchemaSource>,
    timeout: Duration,
}

impl SpecMetadataResolver {
    pub fn new(source: Arc<dyn SpecSchemaSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Searchable parameters of a category
    pub async fn resolve(&self, category_id: i64) -> Result<SpecParams> {
        let raw = bounded(
            "specification schema lookup",
            self.timeout,
            self.source.schema_by_category_id(category_id),
        )
        .await?;

        let groups = parse_schema(&raw)?;
        let params = SpecParams::from_groups(&groups);
        debug!(
            "Category {} has {} numeric and {} text searchable parameters",
            category_id,
            params.numeric.len(),
            params.text.len()
        );
        Ok(params)
    }
}
