//! Catalog error types

use thiserror::Error;
use warden_engine::{ConfigError, EngineError};
use warden_resource::ResourceError;
use warden_roles::RoleError;

/// Errors raised while setting up or serving the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Authorization, projection or collaborator failure
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Resource declaration failed
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Role declaration failed
    #[error(transparent)]
    Role(#[from] RoleError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No resource mounted at the requested path
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Document not found
    #[error("{model} not found: {id}")]
    NotFound {
        /// Model name.
        model: String,
        /// Requested id.
        id: String,
    },

    /// Record could not be stored
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Engine(EngineError::Callback(_)) => 409,
            CatalogError::Engine(err) => err.status_code(),
            CatalogError::UnknownResource(_) | CatalogError::NotFound { .. } => 404,
            CatalogError::Resource(_)
            | CatalogError::Role(_)
            | CatalogError::Config(_)
            | CatalogError::Storage(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Engine(err) => err.error_code(),
            CatalogError::Resource(err) => err.error_code(),
            CatalogError::Role(err) => err.error_code(),
            CatalogError::Config(_) => "CONFIG_ERROR",
            CatalogError::UnknownResource(_) => "UNKNOWN_RESOURCE",
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}
