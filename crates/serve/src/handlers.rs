//! HTTP handlers for the search API

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use shopfacet_core::{ErrorCategory, SearchRequest, SearchResult, SearchService, ShopfacetError};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

impl AppState {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self { service }
    }
}

/// Query parameters of `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub key: String,
    pub page: Option<i32>,
    pub sort_by: Option<String>,
    pub descending: Option<bool>,
}

impl From<SearchParams> for SearchRequest {
    fn from(params: SearchParams) -> Self {
        let mut request = SearchRequest::new(params.key);
        if let Some(page) = params.page {
            request = request.with_page(page);
        }
        if let Some(field) = params.sort_by {
            request = request.with_sort(field, params.descending.unwrap_or(false));
        }
        request
    }
}

/// Error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category
    pub error: String,
    /// Optional error details
    pub details: Option<String>,
}

/// Search failure rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub ShopfacetError);

impl From<ShopfacetError> for ApiError {
    fn from(err: ShopfacetError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCategory::Engine | ErrorCategory::Network => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Search failed ({}): {}", status, self.0);
        } else {
            warn!("Rejected search request: {}", self.0);
        }

        let body = Json(ErrorResponse {
            error: self.0.category().to_string(),
            details: Some(self.0.to_string()),
        });

        (status, body).into_response()
    }
}

/// `POST /search`
///
/// Answers `null` for a blank key.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Option<SearchResult>>, ApiError> {
    info!("POST search request: key='{}'", request.key());
    let result = state.service.search(&request).await?;
    Ok(Json(result))
}

/// `GET /search?key=..&page=..&sortBy=..&descending=..`
pub async fn handle_search_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Option<SearchResult>>, ApiError> {
    info!("GET search request: key='{}'", params.key);
    let request = SearchRequest::from(params);
    let result = state.service.search(&request).await?;
    Ok(Json(result))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `GET /health`
pub async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
    })
}
