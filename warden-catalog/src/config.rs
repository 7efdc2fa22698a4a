//! Catalog configuration.
//!
//! Loaded from environment variables, with defaults suitable for local
//! development.

use serde::{Deserialize, Serialize};
use warden_engine::ConfigError;

/// Settings for the catalog application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URI prepended to resource paths in `Location` headers.
    pub base_uri: String,

    /// Request parameter carrying the API key.
    pub api_key_param: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:4567".to_string(),
            api_key_param: "api_key".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CATALOG_BASE_URI`: base URI (default: http://localhost:4567)
    /// - `CATALOG_API_KEY_PARAM`: API key parameter name (default: api_key)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_uri: std::env::var("CATALOG_BASE_URI").unwrap_or(default.base_uri),
            api_key_param: std::env::var("CATALOG_API_KEY_PARAM")
                .unwrap_or(default.api_key_param),
        }
    }

    /// Check the base URI scheme and that the key parameter is named.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_uri.starts_with("http://") && !self.base_uri.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "CATALOG_BASE_URI".to_string(),
                message: format!("expected an http(s) URI, got {}", self.base_uri),
            });
        }
        if self.api_key_param.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CATALOG_API_KEY_PARAM".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Join `path` onto the base URI.
    pub fn full_uri(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_uri.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
