//! Elasticsearch document store client

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shopfacet_core::{
    config::ElasticsearchConfig, DocumentStore, Result, SearchResponse, SearchSource,
    ShopfacetError,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Document store backed by an Elasticsearch-compatible `_search` endpoint
#[derive(Debug, Clone)]
pub struct ElasticsearchStore {
    client: reqwest::Client,
    search_url: String,
}

impl ElasticsearchStore {
    /// Create a store for the configured cluster and index
    pub fn new(config: &ElasticsearchConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let search_url = format!(
            "{}/{}/_search",
            config.url.as_str().trim_end_matches('/'),
            config.index
        );

        Ok(Self { client, search_url })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn search(&self, source: &SearchSource) -> Result<SearchResponse> {
        let body = source.to_json();
        debug!("POST {} {}", self.search_url, body);

        let response = self
            .client
            .post(&self.search_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ShopfacetError::timeout("document store request")
                } else {
                    ShopfacetError::network(format!("Failed to reach document store: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Document store returned {}: {}", status, text);
            return Err(ShopfacetError::engine(format!(
                "Search failed with status {}: {}",
                status,
                error_reason(&text)
            )));
        }

        let raw: Value = response.json().await.map_err(|e| {
            ShopfacetError::engine(format!("Failed to decode search response: {}", e))
        })?;

        SearchResponse::from_engine_json(raw, source)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        reason: Option<String>,
    },
    Plain(String),
}

/// Short reason from an engine error body, or the body itself
fn error_reason(text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            error: ErrorDetail::Structured { kind, reason },
        }) => match reason {
            Some(reason) => format!("{}: {}", kind, reason),
            None => kind,
        },
        Ok(ErrorBody {
            error: ErrorDetail::Plain(message),
        }) => message,
        Err(_) => text.to_string(),
    }
}
