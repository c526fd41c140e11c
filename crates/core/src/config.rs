//! Configuration types for Shopfacet core library

use crate::{Result, ShopfacetError};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Prefix for environment variable overrides, e.g. `SHOPFACET__SEARCH__PAGE_SIZE`
pub const ENV_PREFIX: &str = "SHOPFACET";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopfacetConfig {
    /// Search behavior settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Document store connection
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    /// Item service (category, brand and specification lookups)
    #[serde(default)]
    pub item_service: ItemServiceConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ShopfacetConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            elasticsearch: ElasticsearchConfig::default(),
            item_service: ItemServiceConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Search behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of products per result page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Timeout for each document store round trip, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Timeout for each peer lookup call, in milliseconds
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl SearchConfig {
    /// Bound applied to every document store round trip
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Bound applied to every peer lookup call
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            timeout_ms: default_timeout_ms(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

/// Elasticsearch-compatible document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster
    #[serde(default = "default_elasticsearch_url")]
    pub url: Url,
    /// Index holding the goods documents
    #[serde(default = "default_index")]
    pub index: String,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_elasticsearch_url(),
            index: default_index(),
        }
    }
}

/// Item service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemServiceConfig {
    /// Base URL of the item service
    #[serde(default = "default_item_service_url")]
    pub url: Url,
}

impl Default for ItemServiceConfig {
    fn default() -> Self {
        Self {
            url: default_item_service_url(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to allow cross-origin requests
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    /// Maximum accepted request body, in bytes
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            max_request_size: default_max_request_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ShopfacetConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// Later sources override earlier ones. Environment keys use `__` between
    /// sections, e.g. `SHOPFACET__ELASTICSEARCH__INDEX=goods_v2`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default())?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        // Try YAML first, then JSON
        match serde_yaml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(_) => {
                let config = serde_json::from_str(&content)?;
                Ok(config)
            }
        }
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            return Err(ShopfacetError::validation(
                "search.page_size must be greater than 0",
            ));
        }

        if self.search.timeout_ms == 0 || self.search.lookup_timeout_ms == 0 {
            return Err(ShopfacetError::validation(
                "search timeouts must be greater than 0",
            ));
        }

        for (name, url) in [
            ("elasticsearch.url", &self.elasticsearch.url),
            ("item_service.url", &self.item_service.url),
        ] {
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ShopfacetError::validation(format!(
                    "{} must use http or https scheme",
                    name
                )));
            }
        }

        if self.elasticsearch.index.trim().is_empty() {
            return Err(ShopfacetError::validation(
                "elasticsearch.index cannot be empty",
            ));
        }

        Ok(())
    }
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_page_size() -> usize {
    20
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_lookup_timeout_ms() -> u64 {
    3000
}
fn default_elasticsearch_url() -> Url {
    Url::parse("http://localhost:9200").expect("static URL is valid")
}
fn default_index() -> String {
    "goods".to_string()
}
fn default_item_service_url() -> Url {
    Url::parse("http://localhost:8081").expect("static URL is valid")
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8083
}
fn default_max_request_size() -> usize {
    1024 * 1024
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
