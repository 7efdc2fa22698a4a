//! # Properties
//!
//! Per-property access rules. Each property can be given a minimum role for
//! reading and a minimum role for writing. A direction without a rule is closed
//! to everyone (`nobody`).

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use warden_roles::Role;

use crate::actions::Access;
use crate::document::Document;

/// Custom extraction function for a property.
pub type PropertyReader = Arc<dyn Fn(&dyn Document) -> Value + Send + Sync>;

/// Access rule for a single property.
///
/// # Example
///
/// ```
/// use warden_resource::{Access, PropertyRule};
/// use warden_roles::Role;
///
/// let mut rule = PropertyRule::default();
/// rule.set(Access::Read, Role::new("owner"));
///
/// assert_eq!(rule.minimum(Access::Read), Role::new("owner"));
/// assert_eq!(rule.minimum(Access::Write), Role::NOBODY);
/// ```
#[derive(Clone, Default)]
pub struct PropertyRule {
    /// Minimum role to read the property.
    read: Option<Role>,
    /// Minimum role to write the property.
    write: Option<Role>,
    /// Replaces the plain attribute lookup when present.
    reader: Option<PropertyReader>,
}

impl PropertyRule {
    /// Set the minimum role for one direction, replacing any earlier rule.
    pub fn set(&mut self, access: Access, role: Role) {
        match access {
            Access::Read => self.read = Some(role),
            Access::Write => self.write = Some(role),
        }
    }

    /// The declared minimum for a direction, if any.
    pub fn declared(&self, access: Access) -> Option<&Role> {
        match access {
            Access::Read => self.read.as_ref(),
            Access::Write => self.write.as_ref(),
        }
    }

    /// The minimum for a direction, `nobody` when undeclared.
    pub fn minimum(&self, access: Access) -> Role {
        self.declared(access).cloned().unwrap_or(Role::NOBODY)
    }

    /// Install a custom extraction function.
    pub fn set_reader(&mut self, reader: PropertyReader) {
        self.reader = Some(reader);
    }

    /// The custom extraction function, if any.
    pub fn reader(&self) -> Option<&PropertyReader> {
        self.reader.as_ref()
    }

    /// Roles referenced by this rule.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.read.iter().chain(self.write.iter())
    }
}

impl fmt::Debug for PropertyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRule")
            .field("read", &self.read)
            .field("write", &self.write)
            .field("reader", &self.reader.is_some())
            .finish()
    }
}
