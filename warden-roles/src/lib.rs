//! # Warden Roles
//!
//! This crate provides the role hierarchy used by every warden authorization
//! check.
//!
//! ## Overview
//!
//! The warden-roles crate handles:
//! - **Roles**: Named permission levels such as `anonymous`, `basic` or `admin`
//! - **Hierarchy**: A satisfaction graph where a role may inherit from several parents
//! - **Satisfaction**: Answering "does role A satisfy minimum role B?"
//!
//! ## Architecture
//!
//! ```text
//!            anonymous
//!                │
//!              basic
//!             ╱     ╲
//!         owner     curator
//!             ╲     ╱
//!              admin
//! ```
//!
//! `admin` satisfies `owner`, `curator`, `basic` and `anonymous`.
//! `curator` does not satisfy `owner`. No declared role satisfies `nobody`.
//!
//! ## Usage
//!
//! ```rust
//! use warden_roles::{Role, RoleHierarchy};
//!
//! let mut roles = RoleHierarchy::new();
//! roles.declare_role("basic", &[Role::ANONYMOUS]).unwrap();
//! roles.declare_role("owner", &["basic"]).unwrap();
//! roles.declare_role("curator", &["basic"]).unwrap();
//! roles.declare_role("admin", &["owner", "curator"]).unwrap();
//!
//! assert!(roles.satisfies(&Role::new("admin"), &Role::new("curator")));
//! assert!(!roles.satisfies(&Role::new("curator"), &Role::new("owner")));
//! assert!(!roles.satisfies(&Role::new("admin"), &Role::NOBODY));
//! ```
//!
//! ## Lifecycle
//!
//! A hierarchy is declared once during application startup and then shared
//! read-only (usually behind an `Arc`) by every resource that uses it.

pub mod error;
pub mod hierarchy;
pub mod role;

// Re-export main types for convenience
pub use error::{RoleError, RoleResult};
pub use hierarchy::RoleHierarchy;
pub use role::Role;
