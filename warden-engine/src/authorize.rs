//! # Authorization
//!
//! Pure authorization functions over a [`ResourceConfig`]. They are used by
//! [`ResourceEngine`](crate::ResourceEngine) and are public so that
//! applications can consult them from their own hooks.
//!
//! Minimum roles follow two different defaults:
//! - an action without a declared permission is an error
//! - a property direction without a declared rule requires `nobody`

use serde::Serialize;
use warden_resource::{Access, Action, ResourceConfig};
use warden_roles::Role;

use crate::error::{EngineError, EngineResult};

/// Outcome of a single authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the role satisfies the minimum.
    pub permitted: bool,
    /// Action being checked.
    pub action: Action,
    /// Role being checked.
    pub role: Role,
    /// Minimum role that applied.
    pub minimum: Role,
    /// Property being checked, for property-level decisions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

/// Minimum role for `action`, or for `property` under `action`.
///
/// # Errors
///
/// `EngineError::UndefinedPermission` when `property` is `None` and no
/// permission is declared for `action`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_engine::authorize::minimum_role;
/// use warden_resource::{Access, Action, ResourceConfig};
/// use warden_roles::{Role, RoleHierarchy};
///
/// let mut roles = RoleHierarchy::new();
/// roles.declare_role("basic", &[Role::ANONYMOUS]).unwrap();
///
/// let mut builder = ResourceConfig::builder("sources");
/// builder.set_model("Source").unwrap().set_roles(Arc::new(roles)).unwrap();
/// builder.set_permission(Action::Read, "basic");
/// builder.set_property("title", Access::Read, "basic");
/// let config = builder.build().unwrap();
///
/// assert_eq!(minimum_role(Action::Read, &config, None).unwrap(), Role::new("basic"));
/// assert!(minimum_role(Action::Delete, &config, None).is_err());
/// assert_eq!(minimum_role(Action::Read, &config, Some("secret")).unwrap(), Role::NOBODY);
/// ```
pub fn minimum_role(
    action: Action,
    config: &ResourceConfig,
    property: Option<&str>,
) -> EngineResult<Role> {
    match property {
        None => config
            .permission(action)
            .cloned()
            .ok_or(EngineError::UndefinedPermission(action)),
        Some(name) => Ok(property_minimum(config, name, action.access())),
    }
}

/// Minimum role to access `property` in the given direction.
pub fn property_minimum(config: &ResourceConfig, property: &str, access: Access) -> Role {
    config
        .property(property)
        .map_or(Role::NOBODY, |rule| rule.minimum(access))
}

/// Evaluate whether `role` may perform `action`, optionally on one property.
///
/// # Errors
///
/// - `EngineError::Role` if `role` is not part of the resource's hierarchy
/// - `EngineError::UndefinedPermission` as for [`minimum_role`]
pub fn decide(
    action: Action,
    role: &Role,
    config: &ResourceConfig,
    property: Option<&str>,
) -> EngineResult<Decision> {
    let roles = config.roles();
    roles.validate_role(role)?;

    let minimum = minimum_role(action, config, property)?;
    let permitted = roles.satisfies(role, &minimum);

    tracing::trace!(
        resource = %config.path(),
        action = %action,
        role = %role,
        minimum = %minimum,
        property = property.unwrap_or_default(),
        permitted,
        "Authorization decision"
    );

    Ok(Decision {
        permitted,
        action,
        role: role.clone(),
        minimum,
        property: property.map(str::to_string),
    })
}

/// Is `role` authorized for `action`, and, if given, `property`?
pub fn authorized(
    action: Action,
    role: &Role,
    config: &ResourceConfig,
    property: Option<&str>,
) -> EngineResult<bool> {
    decide(action, role, config, property).map(|decision| decision.permitted)
}
