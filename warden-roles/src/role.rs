//! Role names
//!
//! A role is a named permission level. Roles carry no behaviour of their own;
//! what a role may do is decided by its position in a [`RoleHierarchy`].
//!
//! [`RoleHierarchy`]: crate::RoleHierarchy

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// A named role such as `anonymous`, `basic` or `admin`.
///
/// Two roles have a fixed meaning:
/// - [`Role::ANONYMOUS`] is the universal base role. Every declared role
///   satisfies it.
/// - [`Role::NOBODY`] is a pseudo-role that no declared role satisfies. It is
///   the minimum for every property direction without an explicit rule.
///
/// # Examples
///
/// ```
/// use warden_roles::Role;
///
/// let role = Role::new("curator");
/// assert_eq!(role.as_str(), "curator");
/// assert_eq!(role, Role::from("curator"));
/// assert!(Role::ANONYMOUS.is_anonymous());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// The universal base role.
    pub const ANONYMOUS: Role = Role(Cow::Borrowed("anonymous"));

    /// The unsatisfiable pseudo-role.
    pub const NOBODY: Role = Role(Cow::Borrowed("nobody"));

    /// Create a role from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Get the role name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the anonymous role.
    pub fn is_anonymous(&self) -> bool {
        self.as_str() == Self::ANONYMOUS.as_str()
    }

    /// Check if this is the nobody pseudo-role.
    pub fn is_nobody(&self) -> bool {
        self.as_str() == Self::NOBODY.as_str()
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::ANONYMOUS
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&Role> for Role {
    fn from(role: &Role) -> Self {
        role.clone()
    }
}
