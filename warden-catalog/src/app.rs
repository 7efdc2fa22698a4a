//! The catalog's side of the engine contract
//!
//! One [`CatalogApp`] is created per request. It carries the API key taken
//! from the request parameters and resolves it against the user records.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use warden_engine::{authorize, Application, EngineError, EngineResult, ErrorBody};
use warden_resource::{Action, Document, ResourceConfig};
use warden_roles::{Role, RoleHierarchy};

use crate::config::CatalogConfig;
use crate::models::{Model, User};
use crate::roles::OWNER;
use crate::store::{CatalogStore, Record};

/// Request-scoped application collaborator.
pub struct CatalogApp {
    store: Arc<CatalogStore>,
    config: Arc<CatalogConfig>,
    roles: Arc<RoleHierarchy>,
    /// Association name to the foreign key naming the parent.
    associations: Arc<HashMap<String, String>>,
    api_key: Option<String>,
}

impl CatalogApp {
    /// Create a collaborator for one request.
    pub fn new(
        store: Arc<CatalogStore>,
        config: Arc<CatalogConfig>,
        roles: Arc<RoleHierarchy>,
        associations: Arc<HashMap<String, String>>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            store,
            config,
            roles,
            associations,
            api_key,
        }
    }

    /// The user behind the request's API key.
    ///
    /// `Ok(None)` when no key was supplied.
    ///
    /// # Errors
    ///
    /// `EngineError::Unauthorized(ErrorBody::InvalidApiKey)` when the key
    /// matches no user.
    pub fn current_user(&self) -> EngineResult<Option<Record>> {
        let Some(api_key) = &self.api_key else {
            return Ok(None);
        };

        let user = self
            .store
            .find_by(User::NAME, "_api_key", &Value::String(api_key.clone()))
            .ok_or_else(|| {
                tracing::debug!("API key matches no user");
                EngineError::Unauthorized(ErrorBody::InvalidApiKey)
            })?;
        Ok(Some(user))
    }

    /// The role stored on the current user, ignoring ownership.
    pub fn stored_role(&self) -> EngineResult<Role> {
        match self.current_user()? {
            Some(user) => role_of(&user),
            None => Ok(Role::ANONYMOUS),
        }
    }
}

fn role_of(user: &Record) -> EngineResult<Role> {
    match user.get("role") {
        Some(Value::String(role)) if !role.is_empty() => Ok(Role::new(role.as_str())),
        _ => Err(EngineError::Collaborator(format!(
            "API key found, but user {} has no role",
            user.id()
        ))),
    }
}

/// Is `user` the owner of `document`?
///
/// True when the document is the user, or when the document's `user_id`
/// points at the user.
fn is_owner(user: &Record, document: &dyn Document) -> bool {
    let user_id = user.id();
    if document.id() == user_id {
        return true;
    }
    matches!(document.attribute("user_id"), Some(Value::String(id)) if id == user_id)
}

#[async_trait]
impl Application for CatalogApp {
    fn lookup_role(&self, document: Option<&dyn Document>) -> EngineResult<Role> {
        let Some(user) = self.current_user()? else {
            return Ok(Role::ANONYMOUS);
        };

        let stored = role_of(&user)?;

        // Ownership only ever adds to the stored role.
        let owner = Role::new(OWNER);
        if document.is_some_and(|document| is_owner(&user, document))
            && !self.roles.satisfies(&stored, &owner)
        {
            return Ok(owner);
        }
        Ok(stored)
    }

    async fn find_document(&self, model: &str, id: &str) -> EngineResult<Option<Box<dyn Document>>> {
        Ok(self.store.get(model, id).map(CatalogStore::boxed))
    }

    async fn find_nested_document(
        &self,
        parent: &dyn Document,
        child_association: &str,
        child_model: &str,
        child_id: &str,
    ) -> EngineResult<Option<Box<dyn Document>>> {
        let foreign_key = self.associations.get(child_association).ok_or_else(|| {
            EngineError::Collaborator(format!("unknown association {child_association}"))
        })?;

        let child = self
            .store
            .get(child_model, child_id)
            .filter(|child| child.get(foreign_key) == Some(&Value::String(parent.id())));
        Ok(child.map(CatalogStore::boxed))
    }

    fn convert(&self, value: &Value) -> EngineResult<String> {
        if value.is_null() {
            return Ok(String::new());
        }
        serde_json::to_string(value).map_err(|e| EngineError::Conversion(e.to_string()))
    }

    fn full_uri(&self, path: &str) -> String {
        self.config.full_uri(path)
    }

    fn before_authorization(
        &self,
        action: Action,
        role: &Role,
        config: &ResourceConfig,
    ) -> EngineResult<()> {
        if role.is_anonymous() && !authorize::minimum_role(action, config, None)?.is_anonymous() {
            return Err(EngineError::Unauthorized(ErrorBody::MissingApiKey));
        }
        Ok(())
    }
}
