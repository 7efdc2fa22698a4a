//! Catalog roles
//!
//! ```text
//! anonymous ← basic ← owner ─┐
//!                   ← curator ┴─ admin
//! ```
//!
//! `owner` is never stored on a user. It is granted per document, when the
//! actor is the document or authored it.

use std::sync::Arc;
use warden_roles::{Role, RoleHierarchy, RoleResult};

/// Any authenticated user.
pub const BASIC: &str = "basic";
/// Relative role: the actor owns the document at hand.
pub const OWNER: &str = "owner";
/// Trusted editor of catalog content.
pub const CURATOR: &str = "curator";
/// Everything an owner or curator can do.
pub const ADMIN: &str = "admin";

/// Declare the catalog's role hierarchy.
pub fn catalog_roles() -> RoleResult<Arc<RoleHierarchy>> {
    let mut roles = RoleHierarchy::new();
    roles.declare_role(BASIC, &[Role::ANONYMOUS])?;
    roles.declare_role(OWNER, &[BASIC])?;
    roles.declare_role(CURATOR, &[BASIC])?;
    roles.declare_role(ADMIN, &[OWNER, CURATOR])?;
    Ok(Arc::new(roles))
}
