//! Error handling for Shopfacet core library

use std::fmt;
use thiserror::Error;

/// Result type alias for Shopfacet operations
pub type Result<T> = std::result::Result<T, ShopfacetError>;

/// Main error type for Shopfacet operations
#[derive(Error, Debug)]
pub enum ShopfacetError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Document store (search engine) errors
    #[error("Search engine error: {message}")]
    Engine { message: String },

    /// Peer lookup service errors
    #[error("{service} lookup error: {message}")]
    Lookup { service: String, message: String },

    /// Specification metadata errors
    #[error("Specification metadata error: {message}")]
    Metadata { message: String },

    /// Network connectivity errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Timeout errors
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    /// Resource not found errors
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },
}

impl ShopfacetError {
    /// Create a search engine error
    pub fn engine<S: Into<String>>(message: S) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Create a lookup error for the named peer service
    pub fn lookup<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Lookup {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a specification metadata error
    pub fn metadata<S: Into<String>>(message: S) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Get error category for logging and status mapping
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) => ErrorCategory::Io,
            Self::Http(_) | Self::Network { .. } => ErrorCategory::Network,
            Self::Json(_) | Self::Yaml(_) => ErrorCategory::Serialization,
            Self::Config(_) | Self::Url(_) => ErrorCategory::Configuration,
            Self::Engine { .. } => ErrorCategory::Engine,
            Self::Lookup { .. } => ErrorCategory::Lookup,
            Self::Metadata { .. } => ErrorCategory::Metadata,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Generic(_) => ErrorCategory::Generic,
        }
    }
}

/// Error categories for logging and HTTP status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Io,
    Network,
    Serialization,
    Configuration,
    Engine,
    Lookup,
    Metadata,
    Validation,
    Timeout,
    NotFound,
    Generic,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "io"),
            Self::Network => write!(f, "network"),
            Self::Serialization => write!(f, "serialization"),
            Self::Configuration => write!(f, "configuration"),
            Self::Engine => write!(f, "engine"),
            Self::Lookup => write!(f, "lookup"),
            Self::Metadata => write!(f, "metadata"),
            Self::Validation => write!(f, "validation"),
            Self::Timeout => write!(f, "timeout"),
            Self::NotFound => write!(f, "not_found"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ShopfacetError::engine("index missing");
        assert!(matches!(err, ShopfacetError::Engine { .. }));
        assert_eq!(err.to_string(), "Search engine error: index missing");
    }

    #[test]
    fn test_lookup_error_names_service() {
        let err = ShopfacetError::lookup("brand", "HTTP 503");
        assert_eq!(err.to_string(), "brand lookup error: HTTP 503");
        assert_eq!(err.category(), ErrorCategory::Lookup);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ShopfacetError::metadata("bad json").category(),
            ErrorCategory::Metadata
        );
        assert_eq!(
            ShopfacetError::network("refused").category(),
            ErrorCategory::Network
        );
        assert_eq!(
            ShopfacetError::timeout("primary search").category(),
            ErrorCategory::Timeout
        );
    }

    #[test]
    fn test_error_from_conversions() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ShopfacetError = io_err.into();
        assert!(matches!(err, ShopfacetError::Io(_)));

        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: ShopfacetError = json_err.into();
        assert!(matches!(err, ShopfacetError::Json(_)));
        assert_eq!(err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_error_display() {
        let err = ShopfacetError::timeout("spec facet aggregation");
        assert_eq!(err.to_string(), "Operation timed out: spec facet aggregation");

        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    }
}
