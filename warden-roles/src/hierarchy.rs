//! Role hierarchy
//!
//! This module defines the satisfaction graph over declared roles. A role may
//! declare several parents, so the hierarchy is a directed acyclic graph rather
//! than a single chain.

use std::collections::{HashMap, HashSet};

use crate::error::{RoleError, RoleResult};
use crate::role::Role;

/// A set of declared roles and the parent edges between them.
///
/// Parents must be declared before their children, which keeps the graph
/// acyclic. The transitive closure of every role is computed when the role is
/// declared, so [`satisfies`](RoleHierarchy::satisfies) is a set lookup.
///
/// `anonymous` is declared by [`RoleHierarchy::new`]. A role declared without
/// parents is attached to `anonymous`.
///
/// # Examples
///
/// ```
/// use warden_roles::{Role, RoleHierarchy};
///
/// let mut roles = RoleHierarchy::new();
/// roles.declare_role("basic", &[Role::ANONYMOUS]).unwrap();
/// roles.declare_role("owner", &["basic"]).unwrap();
///
/// assert!(roles.satisfies(&Role::new("owner"), &Role::ANONYMOUS));
/// assert!(!roles.satisfies(&Role::new("basic"), &Role::new("owner")));
/// ```
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    /// Roles in declaration order
    order: Vec<Role>,

    /// Direct parents of each role
    parents: HashMap<Role, Vec<Role>>,

    /// Every role each role satisfies, itself included
    closure: HashMap<Role, HashSet<Role>>,
}

impl RoleHierarchy {
    /// Creates a hierarchy containing only `anonymous`.
    pub fn new() -> Self {
        let mut closure = HashMap::new();
        closure.insert(Role::ANONYMOUS, HashSet::from([Role::ANONYMOUS]));

        Self {
            order: vec![Role::ANONYMOUS],
            parents: HashMap::from([(Role::ANONYMOUS, Vec::new())]),
            closure,
        }
    }

    /// Declare a role with zero or more parent roles.
    ///
    /// # Arguments
    ///
    /// * `name` - The role to declare
    /// * `parents` - Roles that `name` satisfies directly
    ///
    /// # Errors
    ///
    /// - `RoleError::ReservedRole` when declaring `nobody`
    /// - `RoleError::DuplicateRole` if `name` is already declared
    /// - `RoleError::UnknownParent` if a parent has not been declared yet
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_roles::{Role, RoleError, RoleHierarchy};
    ///
    /// let mut roles = RoleHierarchy::new();
    /// let err = roles.declare_role("admin", &["owner"]).unwrap_err();
    /// assert!(matches!(err, RoleError::UnknownParent { .. }));
    /// ```
    pub fn declare_role<P>(&mut self, name: impl Into<Role>, parents: &[P]) -> RoleResult<()>
    where
        P: Clone + Into<Role>,
    {
        let name = name.into();
        if name.is_nobody() {
            return Err(RoleError::ReservedRole(name.to_string()));
        }
        if self.contains(&name) {
            return Err(RoleError::DuplicateRole(name.to_string()));
        }

        let mut direct: Vec<Role> = parents.iter().cloned().map(Into::into).collect();
        if direct.is_empty() {
            direct.push(Role::ANONYMOUS);
        }

        let mut satisfied = HashSet::from([name.clone()]);
        for parent in &direct {
            let inherited = self
                .closure
                .get(parent)
                .ok_or_else(|| RoleError::UnknownParent {
                    role: name.to_string(),
                    parent: parent.to_string(),
                })?;
            satisfied.extend(inherited.iter().cloned());
        }

        tracing::debug!(role = %name, parents = ?direct, "Declared role");

        self.order.push(name.clone());
        self.parents.insert(name.clone(), direct);
        self.closure.insert(name, satisfied);
        Ok(())
    }

    /// Fail unless `role` is declared.
    pub fn validate_role(&self, role: &Role) -> RoleResult<()> {
        if self.contains(role) {
            Ok(())
        } else {
            Err(RoleError::UnknownRole(role.to_string()))
        }
    }

    /// Check if `role` is declared.
    pub fn contains(&self, role: &Role) -> bool {
        self.closure.contains_key(role)
    }

    /// Does `role` satisfy `minimum`?
    ///
    /// True when `minimum` is `role` itself or any ancestor reachable through
    /// parent edges. Always false for `nobody` and for undeclared roles.
    pub fn satisfies(&self, role: &Role, minimum: &Role) -> bool {
        if minimum.is_nobody() {
            return false;
        }
        self.closure
            .get(role)
            .is_some_and(|satisfied| satisfied.contains(minimum))
    }

    /// All declared roles, in declaration order.
    pub fn roles(&self) -> &[Role] {
        &self.order
    }

    /// Direct parents of `role`, or `None` if it is not declared.
    pub fn parents(&self, role: &Role) -> Option<&[Role]> {
        self.parents.get(role).map(Vec::as_slice)
    }

    /// Every role `role` satisfies apart from itself, in declaration order.
    pub fn ancestors(&self, role: &Role) -> Vec<Role> {
        let Some(satisfied) = self.closure.get(role) else {
            return Vec::new();
        };
        self.order
            .iter()
            .filter(|candidate| *candidate != role && satisfied.contains(*candidate))
            .cloned()
            .collect()
    }

    /// Number of declared roles, `anonymous` included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no role is declared. A new hierarchy already holds `anonymous`.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::new()
    }
}
