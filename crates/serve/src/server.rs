//! HTTP server for Shopfacet

use crate::{
    handlers::{handle_health, handle_search, handle_search_query, AppState},
    middleware::{request_id_middleware, timing_middleware},
};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::get,
    Router,
};
use shopfacet_core::{config::ServerConfig, Result, SearchService, ShopfacetError};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Shopfacet HTTP server
pub struct ShopfacetServer {
    config: ServerConfig,
    app: Router,
}

impl ShopfacetServer {
    pub fn new(config: ServerConfig, service: Arc<SearchService>) -> Self {
        let app = create_app(&config, service);
        Self { config, app }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ShopfacetError::validation(format!("Invalid address {}: {}", addr, e)))?;

        tracing::info!("Starting Shopfacet server on {}", addr);

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ShopfacetError::network(format!("Failed to bind to {}: {}", addr, e)))?;

        axum::serve(listener, self.app)
            .await
            .map_err(|e| ShopfacetError::network(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Create the Axum application with middleware
pub fn create_app(config: &ServerConfig, service: Arc<SearchService>) -> Router {
    let state = AppState::new(service);

    let mut app = Router::new()
        .route("/search", get(handle_search_query).post(handle_search))
        .route("/health", get(handle_health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(timing_middleware))
                .layer(RequestBodyLimitLayer::new(config.max_request_size)),
        );

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);

        app = app.layer(cors);
    }

    app
}

/// Server builder for configuration
pub struct ServerBuilder {
    config: ServerConfig,
    service: Option<Arc<SearchService>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::from_config(ServerConfig::default())
    }

    /// Start from an existing server configuration
    pub fn from_config(config: ServerConfig) -> Self {
        Self {
            config,
            service: None,
        }
    }

    /// Set the host address
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    /// Set maximum request size
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.config.max_request_size = size;
        self
    }

    /// Search service answering the requests
    pub fn service(mut self, service: Arc<SearchService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> Result<ShopfacetServer> {
        let service = self
            .service
            .ok_or_else(|| ShopfacetError::validation("server requires a search service"))?;
        Ok(ShopfacetServer::new(self.config, service))
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
