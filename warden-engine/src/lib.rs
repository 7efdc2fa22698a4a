//! # Warden Engine
//!
//! This crate provides request authorization and document projection for
//! resources declared with `warden-resource`.
//!
//! ## Overview
//!
//! The warden-engine crate handles:
//! - **Permission checks**: Is the actor's role enough for the action?
//! - **Parameter checks**: Is the request's shape right, and may the role write every parameter?
//! - **Projection**: Which properties of a document may the role read?
//! - **Relative roles**: Resolving roles such as `owner` per document
//! - **Response shaping**: Status codes, `Location` and bodies via the application codec
//!
//! ## Request Flow
//!
//! ```text
//! router ─→ Application::lookup_role ─→ check_permission ─→ check_params
//!                                                               │
//!                                      store (application) ←───┘
//!                                               │
//!            display ←── build_resource(s) ←────┘
//! ```
//!
//! The engine performs no I/O of its own. Documents are fetched by the
//! application and handed in; serialization is delegated back to it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use serde_json::Value;
//! use warden_engine::{Application, Params, ResourceEngine};
//! use warden_resource::{Action, Document, ResourceConfig};
//!
//! fn handle_read<A: Application>(
//!     engine: &ResourceEngine<A>,
//!     config: &ResourceConfig,
//!     params: &Params,
//!     document: &dyn Document,
//! ) -> warden_engine::EngineResult<String> {
//!     let role = engine.app().lookup_role(Some(document))?;
//!     engine.check_permission(Action::Read, &role, config)?;
//!     engine.check_params(Action::Read, &role, config, params, true)?;
//!
//!     let projection = engine.build_resource(&role, document, config)?;
//!     let response = engine.display(Action::Read, &Value::Object(projection), config, None)?;
//!     Ok(response.body)
//! }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`EngineResult`]. Request-level rejections carry an
//! [`ErrorBody`] and a 401 or 400 status; configuration mistakes map to 500.
//! [`ResourceEngine::error_response`] turns either into a [`Response`].

pub mod application;
pub mod authorize;
pub mod body;
pub mod engine;
pub mod error;
pub mod projection;
pub mod response;
pub mod settings;

// Re-export main types
pub use application::Application;
pub use authorize::Decision;
pub use body::ErrorBody;
pub use engine::{Params, ResourceEngine};
pub use error::{EngineError, EngineResult};
pub use projection::{Projection, ID_PROPERTY};
pub use response::Response;
pub use settings::{ConfigError, EngineSettings};

pub use warden_resource::{Access, Action, Document, ResourceConfig};
pub use warden_roles::{Role, RoleHierarchy};
