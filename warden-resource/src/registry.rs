//! Resource registry
//!
//! Holds the frozen configuration of every mounted resource, keyed by path.
//! Registration normally happens once at startup; when it happens later it
//! takes the write lock and blocks readers until it completes.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ResourceConfig;
use crate::error::{ResourceError, ResourceResult};

/// Process-wide map from mount path to resource configuration.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: RwLock<HashMap<String, Arc<ResourceConfig>>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configuration under its path.
    ///
    /// # Errors
    ///
    /// `ResourceError::Definition` if the path is already taken.
    pub fn register(&self, config: ResourceConfig) -> ResourceResult<Arc<ResourceConfig>> {
        let mut resources = self.resources.write().unwrap_or_else(PoisonError::into_inner);
        if resources.contains_key(config.path()) {
            return Err(ResourceError::Definition(format!(
                "resource already registered at {}",
                config.path()
            )));
        }

        let config = Arc::new(config);
        tracing::info!(path = %config.path(), model = %config.model(), "Registered resource");
        resources.insert(config.path().to_string(), Arc::clone(&config));
        Ok(config)
    }

    /// Look up the configuration mounted at `path`.
    pub fn get(&self, path: &str) -> Option<Arc<ResourceConfig>> {
        self.resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self
            .resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
