//! Item service client
//!
//! The item service owns categories, brands and per-category specification
//! schemas. One client serves all three lookups.

use async_trait::async_trait;
use reqwest::StatusCode;
use shopfacet_core::{
    config::ItemServiceConfig, Brand, BrandLookup, CategoryLookup, Result, ShopfacetError,
    SpecSchemaSource,
};
use std::time::Duration;
use tracing::debug;

const CATEGORY_SERVICE: &str = "category";
const BRAND_SERVICE: &str = "brand";
const SPEC_SERVICE: &str = "specification";

/// HTTP client for the item service
#[derive(Debug, Clone)]
pub struct ItemServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ItemServiceClient {
    pub fn new(config: &ItemServiceConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(
        &self,
        service: &str,
        path: &str,
        ids: Option<&[i64]>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} ids={:?}", url, ids);

        let mut request = self.client.get(&url);
        if let Some(ids) = ids {
            request = request.query(&[("ids", join_ids(ids))]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ShopfacetError::timeout(format!("{} lookup", service))
            } else {
                ShopfacetError::lookup(service, e.to_string())
            }
        })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ShopfacetError::not_found(format!("{} {}", service, path))),
            status => Err(ShopfacetError::lookup(
                service,
                format!("item service returned {}", status),
            )),
        }
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl CategoryLookup for ItemServiceClient {
    async fn names_by_ids(&self, ids: &[i64]) -> Result<Vec<String>> {
        let response = self
            .get(CATEGORY_SERVICE, "/category/names", Some(ids))
            .await?;
        response
            .json()
            .await
            .map_err(|e| ShopfacetError::lookup(CATEGORY_SERVICE, e.to_string()))
    }
}

#[async_trait]
impl BrandLookup for ItemServiceClient {
    async fn brands_by_ids(&self, ids: &[i64]) -> Result<Vec<Brand>> {
        let response = self.get(BRAND_SERVICE, "/brand/list", Some(ids)).await?;
        response
            .json()
            .await
            .map_err(|e| ShopfacetError::lookup(BRAND_SERVICE, e.to_string()))
    }
}

#[async_trait]
impl SpecSchemaSource for ItemServiceClient {
    async fn schema_by_category_id(&self, category_id: i64) -> Result<String> {
        let path = format!("/spec/{}", category_id);
        let response = self.get(SPEC_SERVICE, &path, None).await?;
        response
            .text()
            .await
            .map_err(|e| ShopfacetError::lookup(SPEC_SERVICE, e.to_string()))
    }
}
