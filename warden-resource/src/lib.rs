//! # Warden Resource Configuration
//!
//! This crate provides the declarative description of a REST resource that
//! the warden engine authorizes and projects against.
//!
//! ## Overview
//!
//! The warden-resource crate handles:
//! - **Actions**: `list`, `read`, `create`, `update` and `delete`
//! - **Permissions**: Minimum role per action
//! - **Properties**: Minimum read and write role per property, plus custom readers
//! - **Callbacks**: Lifecycle hooks around create, update and destroy
//! - **Registry**: Frozen configurations keyed by mount path
//!
//! ## Architecture
//!
//! ```text
//! ResourceConfigBuilder ──validate/build──→ ResourceConfig (immutable)
//!     model            "User"
//!     permission       read → basic, modify → owner
//!     property         email { r: owner }, role { r: owner, w: admin }
//!     roles            Arc<RoleHierarchy>
//!     parent           users (for nested resources)
//!     callbacks        after_create → handler
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_resource::{Access, Action, ResourceConfig};
//! use warden_roles::{Role, RoleHierarchy};
//!
//! let mut roles = RoleHierarchy::new();
//! roles.declare_role("basic", &[Role::ANONYMOUS]).unwrap();
//! roles.declare_role("owner", &["basic"]).unwrap();
//!
//! let mut users = ResourceConfig::builder("users");
//! users
//!     .set_model("User")
//!     .unwrap()
//!     .set_roles(Arc::new(roles))
//!     .unwrap()
//!     .set_permission(Action::Read, "basic")
//!     .set_modify_permission("owner")
//!     .set_property("name", Access::Read, "basic")
//!     .set_property("email", Access::Read, "owner");
//!
//! let users = users.build().unwrap();
//! assert_eq!(users.permission(Action::Update), Some(&Role::new("owner")));
//! ```
//!
//! ## Rules Without Declarations
//!
//! - An action without a permission is a configuration error when checked
//! - A property direction without a rule is closed to everyone (`nobody`)

pub mod actions;
pub mod callbacks;
pub mod config;
pub mod document;
pub mod error;
pub mod properties;
pub mod registry;

// Re-export main types for convenience
pub use actions::{Access, Action};
pub use callbacks::{CallbackContext, CallbackError, CallbackEvent, CallbackHandler};
pub use config::{ParentResource, ResourceConfig, ResourceConfigBuilder};
pub use document::Document;
pub use error::{ResourceError, ResourceResult};
pub use properties::{PropertyReader, PropertyRule};
pub use registry::ResourceRegistry;
