//! # Resource Configuration
//!
//! A [`ResourceConfig`] describes one resource type: its backing model, the
//! minimum role for each action, per-property read/write rules, the role
//! hierarchy to check against, an optional parent resource and lifecycle
//! callbacks.
//!
//! Configurations are assembled with a [`ResourceConfigBuilder`] during
//! application startup and frozen by [`ResourceConfigBuilder::build`]. The
//! frozen value has no mutation API and can be shared freely between threads.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use warden_roles::{Role, RoleHierarchy};

use crate::actions::{Access, Action};
use crate::callbacks::{CallbackContext, CallbackError, CallbackEvent, CallbackHandler};
use crate::document::Document;
use crate::error::{ResourceError, ResourceResult};
use crate::properties::PropertyRule;

/// Link from a nested resource to the resource it lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentResource {
    /// Mount path of the parent resource.
    pub path: String,
    /// Model name of the parent resource.
    pub model: String,
}

/// Frozen configuration for one resource type.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_resource::{Access, Action, ResourceConfig};
/// use warden_roles::{Role, RoleHierarchy};
///
/// let mut roles = RoleHierarchy::new();
/// roles.declare_role("basic", &[Role::ANONYMOUS]).unwrap();
///
/// let mut builder = ResourceConfig::builder("sources");
/// builder
///     .set_model("Source")
///     .unwrap()
///     .set_roles(Arc::new(roles))
///     .unwrap()
///     .set_permission(Action::Read, "basic")
///     .set_property("title", Access::Read, "basic");
/// let config = builder.build().unwrap();
///
/// assert_eq!(config.model(), "Source");
/// assert_eq!(config.permission(Action::Read), Some(&Role::new("basic")));
/// assert_eq!(config.permission(Action::Delete), None);
/// ```
#[derive(Clone)]
pub struct ResourceConfig {
    path: String,
    model: String,
    permissions: HashMap<Action, Role>,
    properties: BTreeMap<String, PropertyRule>,
    roles: Arc<RoleHierarchy>,
    parent: Option<ParentResource>,
    callbacks: HashMap<CallbackEvent, CallbackHandler>,
}

impl ResourceConfig {
    /// Start declaring a resource mounted at `path`.
    pub fn builder(path: impl Into<String>) -> ResourceConfigBuilder {
        ResourceConfigBuilder::new(path)
    }

    /// Mount path of the resource.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Backing model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Declared minimum role for `action`.
    pub fn permission(&self, action: Action) -> Option<&Role> {
        self.permissions.get(&action)
    }

    /// Access rule for a property.
    pub fn property(&self, name: &str) -> Option<&PropertyRule> {
        self.properties.get(name)
    }

    /// All declared properties, sorted by name.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyRule)> {
        self.properties.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// The role hierarchy this resource is checked against.
    pub fn roles(&self) -> &RoleHierarchy {
        &self.roles
    }

    /// Shared handle to the role hierarchy.
    pub fn roles_handle(&self) -> &Arc<RoleHierarchy> {
        &self.roles
    }

    /// Parent resource, for nested resources.
    pub fn parent(&self) -> Option<&ParentResource> {
        self.parent.as_ref()
    }

    /// Check if this resource is nested under another.
    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    /// Handler registered for `event`.
    pub fn callback(&self, event: CallbackEvent) -> Option<&CallbackHandler> {
        self.callbacks.get(&event)
    }
}

impl fmt::Debug for ResourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut callbacks: Vec<_> = self.callbacks.keys().map(CallbackEvent::as_str).collect();
        callbacks.sort_unstable();

        f.debug_struct("ResourceConfig")
            .field("path", &self.path)
            .field("model", &self.model)
            .field("permissions", &self.permissions)
            .field("properties", &self.properties)
            .field("roles", &self.roles.roles())
            .field("parent", &self.parent)
            .field("callbacks", &callbacks)
            .finish()
    }
}

/// Accumulates declarations for a resource during startup.
///
/// Each setter mutates the declaration in place. `set_model` and `set_roles`
/// may be called once; the rest overwrite or accumulate.
pub struct ResourceConfigBuilder {
    path: String,
    model: Option<String>,
    permissions: HashMap<Action, Role>,
    properties: BTreeMap<String, PropertyRule>,
    roles: Option<Arc<RoleHierarchy>>,
    parent: Option<ParentResource>,
    callbacks: HashMap<CallbackEvent, CallbackHandler>,
}

impl ResourceConfigBuilder {
    /// Creates an empty declaration for a resource mounted at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            model: None,
            permissions: HashMap::new(),
            properties: BTreeMap::new(),
            roles: None,
            parent: None,
            callbacks: HashMap::new(),
        }
    }

    /// Set the backing model.
    ///
    /// # Errors
    ///
    /// `ResourceError::Definition` if a model was already declared.
    pub fn set_model(&mut self, model: impl Into<String>) -> ResourceResult<&mut Self> {
        if self.model.is_some() {
            return Err(ResourceError::Definition("model already declared".to_string()));
        }
        self.model = Some(model.into());
        Ok(self)
    }

    /// Set the minimum role for `action`, replacing any earlier declaration.
    pub fn set_permission(&mut self, action: Action, role: impl Into<Role>) -> &mut Self {
        self.permissions.insert(action, role.into());
        self
    }

    /// Set the same minimum role for create, update and delete.
    pub fn set_modify_permission(&mut self, role: impl Into<Role>) -> &mut Self {
        let role = role.into();
        for action in Action::modifying() {
            self.permissions.insert(action, role.clone());
        }
        self
    }

    /// Set the minimum role to read or write a property.
    ///
    /// Read and write rules for the same property accumulate.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        access: Access,
        role: impl Into<Role>,
    ) -> &mut Self {
        self.properties
            .entry(name.into())
            .or_default()
            .set(access, role.into());
        self
    }

    /// Use `reader` instead of the plain attribute lookup when projecting a property.
    pub fn set_property_reader<F>(&mut self, name: impl Into<String>, reader: F) -> &mut Self
    where
        F: Fn(&dyn Document) -> Value + Send + Sync + 'static,
    {
        self.properties
            .entry(name.into())
            .or_default()
            .set_reader(Arc::new(reader));
        self
    }

    /// Set the role hierarchy.
    ///
    /// # Errors
    ///
    /// `ResourceError::Definition` if roles were already declared.
    pub fn set_roles(&mut self, roles: Arc<RoleHierarchy>) -> ResourceResult<&mut Self> {
        if self.roles.is_some() {
            return Err(ResourceError::Definition("roles already declared".to_string()));
        }
        self.roles = Some(roles);
        Ok(self)
    }

    /// Nest this resource under `parent`.
    pub fn set_parent(&mut self, parent: &ResourceConfig) -> &mut Self {
        self.parent = Some(ParentResource {
            path: parent.path().to_string(),
            model: parent.model().to_string(),
        });
        self
    }

    /// Register the handler for a lifecycle event, replacing any earlier one.
    pub fn register_callback<F>(&mut self, event: CallbackEvent, handler: F) -> &mut Self
    where
        F: Fn(&CallbackContext<'_>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.callbacks.insert(event, Arc::new(handler));
        self
    }

    /// Check that the declaration is complete and consistent.
    ///
    /// # Errors
    ///
    /// - `ResourceError::Validation` naming every missing required field
    /// - `ResourceError::Role` for a permission or property role that is not
    ///   part of the hierarchy
    pub fn validate(&self) -> ResourceResult<()> {
        let mut missing = Vec::new();
        if self.model.is_none() {
            missing.push("model".to_string());
        }
        let Some(roles) = &self.roles else {
            missing.push("roles".to_string());
            return Err(ResourceError::Validation(missing));
        };
        if !missing.is_empty() {
            return Err(ResourceError::Validation(missing));
        }

        let referenced = self
            .permissions
            .values()
            .chain(self.properties.values().flat_map(PropertyRule::roles));
        for role in referenced {
            if !role.is_nobody() {
                roles.validate_role(role)?;
            }
        }
        Ok(())
    }

    /// Validate and freeze the declaration.
    pub fn build(self) -> ResourceResult<ResourceConfig> {
        self.validate()?;

        let (Some(model), Some(roles)) = (self.model, self.roles) else {
            return Err(ResourceError::Validation(vec!["model".into(), "roles".into()]));
        };

        tracing::debug!(
            path = %self.path,
            model = %model,
            properties = self.properties.len(),
            "Built resource configuration"
        );

        Ok(ResourceConfig {
            path: self.path,
            model,
            permissions: self.permissions,
            properties: self.properties,
            roles,
            parent: self.parent,
            callbacks: self.callbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_roles::RoleError;

    fn roles() -> Arc<RoleHierarchy> {
        let mut roles = RoleHierarchy::new();
        roles.declare_role("basic", &[Role::ANONYMOUS]).unwrap();
        roles.declare_role("owner", &["basic"]).unwrap();
        roles.declare_role("admin", &["owner"]).unwrap();
        Arc::new(roles)
    }

    fn users() -> ResourceConfigBuilder {
        let mut builder = ResourceConfig::builder("users");
        builder.set_model("User").unwrap().set_roles(roles()).unwrap();
        builder
    }

    #[test]
    fn test_model_and_roles_are_set_once() {
        let mut builder = users();
        assert_eq!(
            builder.set_model("Other").err(),
            Some(ResourceError::Definition("model already declared".into()))
        );
        assert_eq!(
            builder.set_roles(roles()).err(),
            Some(ResourceError::Definition("roles already declared".into()))
        );
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let builder = ResourceConfig::builder("users");
        assert_eq!(
            builder.validate(),
            Err(ResourceError::Validation(vec!["model".into(), "roles".into()]))
        );

        let mut builder = ResourceConfig::builder("users");
        builder.set_roles(roles()).unwrap();
        assert_eq!(
            builder.validate(),
            Err(ResourceError::Validation(vec!["model".into()]))
        );
    }

    #[test]
    fn test_validate_rejects_unknown_roles() {
        let mut builder = users();
        builder.set_property("email", Access::Read, "superuser");
        assert_eq!(
            builder.build().err(),
            Some(ResourceError::Role(RoleError::UnknownRole("superuser".into())))
        );

        let mut builder = users();
        builder.set_permission(Action::Read, "curator");
        assert!(matches!(builder.validate(), Err(ResourceError::Role(_))));
    }

    #[test]
    fn test_nobody_is_accepted_in_rules() {
        let mut builder = users();
        builder
            .set_property("id", Access::Read, "basic")
            .set_property("id", Access::Write, Role::NOBODY);
        assert!(builder.validate().is_ok());
    }

    #[test]
    fn test_properties_accumulate() {
        let mut builder = users();
        builder
            .set_property("role", Access::Read, "owner")
            .set_property("role", Access::Write, "admin");
        let config = builder.build().unwrap();

        let rule = config.property("role").unwrap();
        assert_eq!(rule.minimum(Access::Read), Role::new("owner"));
        assert_eq!(rule.minimum(Access::Write), Role::new("admin"));
        assert!(config.property("missing").is_none());
    }

    #[test]
    fn test_modify_shorthand() {
        let mut builder = users();
        builder
            .set_permission(Action::Read, "basic")
            .set_modify_permission("owner")
            .set_permission(Action::Delete, "admin");
        let config = builder.build().unwrap();

        assert_eq!(config.permission(Action::Create), Some(&Role::new("owner")));
        assert_eq!(config.permission(Action::Update), Some(&Role::new("owner")));
        assert_eq!(config.permission(Action::Delete), Some(&Role::new("admin")));
        assert_eq!(config.permission(Action::List), None);
    }

    #[test]
    fn test_parent_and_callbacks() {
        let parent = users().build().unwrap();

        let mut builder = ResourceConfig::builder("notes");
        builder
            .set_model("Note")
            .unwrap()
            .set_roles(roles())
            .unwrap()
            .set_parent(&parent)
            .register_callback(CallbackEvent::AfterCreate, |_| Ok(()));
        let config = builder.build().unwrap();

        assert!(config.is_nested());
        assert_eq!(
            config.parent(),
            Some(&ParentResource {
                path: "users".into(),
                model: "User".into(),
            })
        );
        assert!(config.callback(CallbackEvent::AfterCreate).is_some());
        assert!(config.callback(CallbackEvent::BeforeCreate).is_none());
        assert!(format!("{config:?}").contains("after_create"));
    }

    #[test]
    fn test_properties_iterate_in_name_order() {
        let mut builder = users();
        builder
            .set_property("name", Access::Read, "basic")
            .set_property("email", Access::Read, "owner")
            .set_property("created_at", Access::Read, "owner");
        let config = builder.build().unwrap();

        let names: Vec<_> = config.properties().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["created_at", "email", "name"]);
    }
}
