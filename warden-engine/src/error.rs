//! Error types for authorization and projection
//!
//! This module defines every error the engine can return. Configuration
//! errors (unknown roles, undefined permissions, broken declarations) mean a
//! resource was declared incorrectly and map to 500. Request errors carry an
//! [`ErrorBody`] and map to 401 or 400.

use thiserror::Error;
use warden_resource::{Action, CallbackError, ResourceError};
use warden_roles::RoleError;

use crate::body::ErrorBody;
use crate::settings::ConfigError;

/// Engine error types.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Role is not part of the resource's hierarchy
    #[error(transparent)]
    Role(#[from] RoleError),

    /// Resource declaration is invalid
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// No minimum role declared for an action
    #[error("Undefined {0} permission")]
    UndefinedPermission(Action),

    /// Request rejected for its credential or role
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),

    /// Request rejected for its parameters
    #[error("Bad request: {0}")]
    BadRequest(ErrorBody),

    /// Nested resource location requested without a parent id
    #[error("Expecting parent id for nested resource {0}")]
    MissingParentId(String),

    /// Object handed to `location` has no `id`
    #[error("Object has no id for resource {0}")]
    MissingIdentifier(String),

    /// Lifecycle callback failed
    #[error(transparent)]
    Callback(#[from] CallbackError),

    /// Application codec failed
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Application lookup failed
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Engine settings are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Check if this error should be logged at error level.
    ///
    /// Rejected requests are expected and should not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Check if this error comes from a broken resource declaration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::Role(_)
                | EngineError::Resource(_)
                | EngineError::UndefinedPermission(_)
                | EngineError::Config(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Unauthorized(_) => 401,
            EngineError::BadRequest(_) => 400,

            EngineError::Role(_)
            | EngineError::Resource(_)
            | EngineError::UndefinedPermission(_)
            | EngineError::MissingParentId(_)
            | EngineError::MissingIdentifier(_)
            | EngineError::Callback(_)
            | EngineError::Conversion(_)
            | EngineError::Collaborator(_)
            | EngineError::Config(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::Role(err) => err.error_code(),
            EngineError::Resource(err) => err.error_code(),
            EngineError::UndefinedPermission(_) => "UNDEFINED_PERMISSION",
            EngineError::Unauthorized(_) => "UNAUTHORIZED",
            EngineError::BadRequest(_) => "BAD_REQUEST",
            EngineError::MissingParentId(_) => "MISSING_PARENT_ID",
            EngineError::MissingIdentifier(_) => "MISSING_IDENTIFIER",
            EngineError::Callback(_) => "CALLBACK_ERROR",
            EngineError::Conversion(_) => "CONVERSION_ERROR",
            EngineError::Collaborator(_) => "COLLABORATOR_ERROR",
            EngineError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Payload to send back to the client.
    ///
    /// Server-side errors never expose their details.
    pub fn body(&self) -> ErrorBody {
        match self {
            EngineError::Unauthorized(body) | EngineError::BadRequest(body) => body.clone(),
            _ => ErrorBody::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(EngineError::Unauthorized(ErrorBody::Unauthorized).status_code(), 401);
        assert_eq!(EngineError::BadRequest(ErrorBody::NoParams).status_code(), 400);
        assert_eq!(EngineError::UndefinedPermission(Action::Read).status_code(), 500);
        assert_eq!(
            EngineError::Role(RoleError::UnknownRole("x".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::UndefinedPermission(Action::Delete);
        assert_eq!(err.to_string(), "Undefined delete permission");

        let err = EngineError::BadRequest(ErrorBody::InvalidParams(vec!["email".into()]));
        assert_eq!(err.to_string(), "Bad request: invalid_params: email");
    }

    #[test]
    fn test_configuration_errors() {
        assert!(EngineError::UndefinedPermission(Action::List).is_configuration_error());
        assert!(EngineError::Role(RoleError::UnknownRole("x".into())).is_configuration_error());
        assert!(!EngineError::BadRequest(ErrorBody::NoParams).is_configuration_error());
    }

    #[test]
    fn test_body_hides_server_errors() {
        let err = EngineError::Conversion("bad utf-8".into());
        assert!(err.is_server_error());
        assert_eq!(err.body(), ErrorBody::InternalServerError);

        let err = EngineError::Unauthorized(ErrorBody::MissingApiKey);
        assert!(!err.is_server_error());
        assert_eq!(err.body(), ErrorBody::MissingApiKey);
        assert_eq!(err.error_code(), "UNAUTHORIZED");
    }
}
