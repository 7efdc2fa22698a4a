//! Response shaping
//!
//! Turns a projected value into the status, `Location` and body the router
//! sends back. Serialization itself is always left to
//! [`Application::convert`].

use serde_json::Value;
use warden_resource::{Action, ResourceConfig};

use crate::application::Application;
use crate::engine::ResourceEngine;
use crate::error::{EngineError, EngineResult};
use crate::projection::ID_PROPERTY;

/// What the router should send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// `Location` header, set for created resources.
    pub location: Option<String>,
    /// Body produced by the application's codec.
    pub body: String,
}

impl<A: Application> ResourceEngine<A> {
    /// Absolute URI of `object` within the resource.
    ///
    /// `<path>/<id>` for a simple resource, and
    /// `<parent path>/<parent_id>/<path>/<id>` for a nested one.
    ///
    /// # Errors
    ///
    /// - `EngineError::MissingParentId` for a nested resource without `parent_id`
    /// - `EngineError::MissingIdentifier` if `object` has no usable `id`
    pub fn location(
        &self,
        object: &Value,
        config: &ResourceConfig,
        parent_id: Option<&str>,
    ) -> EngineResult<String> {
        let id = match object.get(ID_PROPERTY) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(EngineError::MissingIdentifier(config.path().to_string())),
        };

        let path = match config.parent() {
            Some(parent) => {
                let parent_id = parent_id
                    .ok_or_else(|| EngineError::MissingParentId(config.path().to_string()))?;
                format!("{}/{}/{}/{}", parent.path, parent_id, config.path(), id)
            }
            None => format!("{}/{}", config.path(), id),
        };
        Ok(self.app().full_uri(&path))
    }

    /// Shape the response to `action` around `object`.
    ///
    /// - `create`: 201 with a `Location` header
    /// - `delete`: 204
    /// - `list`, `read`, `update`: 200
    pub fn display(
        &self,
        action: Action,
        object: &Value,
        config: &ResourceConfig,
        parent_id: Option<&str>,
    ) -> EngineResult<Response> {
        let (status, location) = match action {
            Action::Create => (201, Some(self.location(object, config, parent_id)?)),
            Action::Delete => (204, None),
            Action::List | Action::Read | Action::Update => (200, None),
        };

        Ok(Response {
            status,
            location,
            body: self.app().convert(object)?,
        })
    }

    /// Response for a failed request.
    ///
    /// Server-side errors are logged here and answered with a generic body.
    pub fn error_response(&self, error: &EngineError) -> EngineResult<Response> {
        if error.is_server_error() {
            tracing::error!(error = %error, code = error.error_code(), "Request failed");
        } else {
            tracing::debug!(error = %error, "Request rejected");
        }

        Ok(Response {
            status: error.status_code(),
            location: None,
            body: self.app().convert(&error.body().to_value())?,
        })
    }
}
