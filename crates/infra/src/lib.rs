//! Shopfacet Infrastructure Library
//!
//! Clients for the services the search engine talks to: the
//! Elasticsearch-compatible document store and the item service that owns
//! categories, brands and specification schemas. Also hosts logging setup.

use shopfacet_core::{Result, SearchService, ShopfacetConfig};
use std::sync::Arc;

pub mod elasticsearch;
pub mod item_service;
pub mod logger;

pub use elasticsearch::ElasticsearchStore;
pub use item_service::ItemServiceClient;
pub use logger::{init_logger, LogFormat, LoggerConfig};

/// Infrastructure version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire a search service to the configured document store and item service
pub fn build_search_service(config: &ShopfacetConfig) -> Result<SearchService> {
    let store = ElasticsearchStore::new(&config.elasticsearch, config.search.store_timeout())?;
    let items = Arc::new(ItemServiceClient::new(
        &config.item_service,
        config.search.lookup_timeout(),
    )?);

    tracing::info!(
        "Search service using {} and item service {}",
        store.search_url(),
        items.base_url()
    );

    Ok(SearchService::new(
        Arc::new(store),
        items.clone(),
        items.clone(),
        items,
        config.search.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_service_from_defaults() {
        let config = ShopfacetConfig::default();
        let service = build_search_service(&config).unwrap();
        assert_eq!(service.config().page_size, 20);
    }
}
