//! # Warden Catalog
//!
//! A small data catalog built on warden: users, the data sources they
//! curate, and notes attached to sources. It shows a complete embedding of
//! the engine and backs the workspace's integration tests.
//!
//! ## Overview
//!
//! - **Roles**: `anonymous ← basic ← owner, curator`; `admin ← owner, curator`
//! - **Resources**: `users`, `sources`, and `notes` nested under sources
//! - **Credentials**: an `api_key` request parameter, resolved against user records
//! - **Ownership**: a user owns itself and every document whose `user_id` names it
//! - **Storage**: an in-memory store of JSON records
//!
//! ## Usage
//!
//! ```rust,no_run
//! use warden_catalog::{Catalog, Request};
//! use warden_catalog::models::User;
//! use warden_resource::Action;
//! use warden_roles::Role;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::from_env()?;
//! let admin = User::new("Ada", "ada@example.org", Role::new("admin"));
//! catalog.store().insert(&admin)?;
//!
//! let response = catalog
//!     .respond(
//!         Request::new(Action::Create, "sources")
//!             .with_param("api_key", admin.api_key.clone())
//!             .with_param("title", "Census 2010")
//!             .with_param("url", "http://census.gov"),
//!     )
//!     .await;
//! assert_eq!(response.status, 201);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod resources;
pub mod roles;
pub mod store;

// Re-export main types
pub use app::CatalogApp;
pub use catalog::{Catalog, Request};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use models::{Model, Note, Source, User};
pub use query::{Clause, ListQuery};
pub use roles::catalog_roles;
pub use store::{CatalogStore, Record};
