//! Application collaborator
//!
//! The engine never touches the network, the store or a codec. Everything
//! it needs from the outside world comes through the [`Application`] trait,
//! which the embedding application implements once.

use async_trait::async_trait;
use serde_json::Value;
use warden_resource::{Action, Document, ResourceConfig};
use warden_roles::Role;

use crate::error::EngineResult;

/// Operations the embedding application provides to the engine.
#[async_trait]
pub trait Application: Send + Sync {
    /// Resolve the current actor's role, optionally relative to `document`.
    ///
    /// Must return `anonymous` when no credential was supplied, and an
    /// `EngineError::Unauthorized(ErrorBody::InvalidApiKey)` when a credential
    /// was supplied but is not valid. Passing a document allows relative roles
    /// such as `owner`.
    fn lookup_role(&self, document: Option<&dyn Document>) -> EngineResult<Role>;

    /// Fetch a document by model name and id.
    async fn find_document(&self, model: &str, id: &str) -> EngineResult<Option<Box<dyn Document>>>;

    /// Fetch a child document through an association of `parent`.
    async fn find_nested_document(
        &self,
        parent: &dyn Document,
        child_association: &str,
        child_model: &str,
        child_id: &str,
    ) -> EngineResult<Option<Box<dyn Document>>>;

    /// Serialize a projected value into the wire format.
    fn convert(&self, value: &Value) -> EngineResult<String>;

    /// Turn a resource path into an absolute URI.
    fn full_uri(&self, path: &str) -> String;

    /// Application-level check run before the engine's own permission check.
    ///
    /// Typically used to reject missing or invalid credentials with their own
    /// error bodies.
    fn before_authorization(
        &self,
        action: Action,
        role: &Role,
        config: &ResourceConfig,
    ) -> EngineResult<()>;
}
