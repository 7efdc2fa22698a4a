//! Engine settings.
//!
//! Names of the request parameters that are never treated as properties:
//! the filter and search keys used by list endpoints. Loaded from environment
//! variables with defaults matching the conventional `filter` and `search`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Settings shared by every resource an engine serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Parameter carrying a list filter expression.
    pub filter_key: String,

    /// Parameter carrying a full-text search query.
    pub search_key: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            filter_key: "filter".to_string(),
            search_key: "search".to_string(),
        }
    }
}

impl EngineSettings {
    /// Load settings from environment variables.
    ///
    /// Environment variables:
    /// - `WARDEN_FILTER_KEY`: filter parameter name (default: filter)
    /// - `WARDEN_SEARCH_KEY`: search parameter name (default: search)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            filter_key: std::env::var("WARDEN_FILTER_KEY").unwrap_or(default.filter_key),
            search_key: std::env::var("WARDEN_SEARCH_KEY").unwrap_or(default.search_key),
        }
    }

    /// Check that both keys are set and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "WARDEN_FILTER_KEY".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.search_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "WARDEN_SEARCH_KEY".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.filter_key == self.search_key {
            return Err(ConfigError::InvalidValue {
                key: "WARDEN_SEARCH_KEY".to_string(),
                message: format!("must differ from the filter key ({})", self.filter_key),
            });
        }
        Ok(())
    }

    /// Is `key` the filter or search parameter?
    pub fn is_query_key(&self, key: &str) -> bool {
        key == self.filter_key || key == self.search_key
    }
}
