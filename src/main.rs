//! Shopfacet - marketplace product search
//!
//! Full-text product search over an Elasticsearch-compatible index with
//! category, brand and specification facets derived from the hits.

use clap::{Parser, Subcommand};
use shopfacet_core::{Result, SearchRequest, ShopfacetConfig};
use shopfacet_infra::{build_search_service, init_logger, LoggerConfig};
use shopfacet_serve::ServerBuilder;
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "shopfacet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shopfacet - product search with category, brand and specification facets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP search server
    Serve {
        /// Server host address (overrides configuration)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one search and print the result as JSON
    Search {
        /// Search key
        key: String,

        /// Page number, starting at 1
        #[arg(long)]
        page: Option<i32>,

        /// Field to sort by
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort in descending order
        #[arg(long)]
        descending: bool,
    },

    /// Validate configuration
    Validate,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ShopfacetConfig::load(cli.config.as_deref())?;

    let mut logger = LoggerConfig::from_config(&config.logging)?;
    if cli.verbose {
        logger = logger.verbose();
    }
    init_logger(logger)?;

    info!("Starting Shopfacet v{}", env!("CARGO_PKG_VERSION"));

    let outcome = match cli.command {
        Commands::Serve { host, port } => handle_serve(config, host, port).await,
        Commands::Search {
            key,
            page,
            sort_by,
            descending,
        } => handle_search(config, key, page, sort_by, descending).await,
        Commands::Validate => handle_validate(&config),
        Commands::Version => {
            println!("{}", shopfacet_core::version_info());
            Ok(())
        }
    };

    if let Err(e) = &outcome {
        error!("Command failed ({}): {}", e.category(), e);
    }
    outcome
}

async fn handle_serve(config: ShopfacetConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    config.validate()?;
    let service = Arc::new(build_search_service(&config)?);

    let mut builder = ServerBuilder::from_config(config.server).service(service);
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }

    builder.build()?.start().await
}

async fn handle_search(
    config: ShopfacetConfig,
    key: String,
    page: Option<i32>,
    sort_by: Option<String>,
    descending: bool,
) -> Result<()> {
    config.validate()?;
    let service = build_search_service(&config)?;

    let mut request = SearchRequest::new(key);
    if let Some(page) = page {
        request = request.with_page(page);
    }
    if let Some(field) = sort_by {
        request = request.with_sort(field, descending);
    }

    let result = service.search(&request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn handle_validate(config: &ShopfacetConfig) -> Result<()> {
    config.validate()?;

    let summary = serde_json::json!({
        "valid": true,
        "elasticsearch": format!("{}{}", config.elasticsearch.url, config.elasticsearch.index),
        "itemService": config.item_service.url.as_str(),
        "pageSize": config.search.page_size,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
