//! Error types for resource configuration
//!
//! These errors are raised while a resource is being declared. They are fatal:
//! a resource that fails validation must never serve requests.

use thiserror::Error;
use warden_roles::RoleError;

/// Resource configuration error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// A declaration was made twice or contradicts an earlier one
    #[error("Definition error: {0}")]
    Definition(String),

    /// Required declarations are missing
    #[error("Validation failed, missing: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A role referenced by the resource is not part of its hierarchy
    #[error(transparent)]
    Role(#[from] RoleError),
}

/// Result type for resource configuration.
pub type ResourceResult<T> = Result<T, ResourceError>;

impl ResourceError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ResourceError::Definition(_) => "DEFINITION_ERROR",
            ResourceError::Validation(_) => "VALIDATION_ERROR",
            ResourceError::Role(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResourceError::Validation(vec!["model".into(), "roles".into()]);
        assert_eq!(err.to_string(), "Validation failed, missing: model, roles");

        let err = ResourceError::Definition("model already declared".into());
        assert_eq!(err.to_string(), "Definition error: model already declared");

        let err: ResourceError = RoleError::UnknownRole("root".into()).into();
        assert_eq!(err.to_string(), "Unknown role: root");
        assert_eq!(err.error_code(), "UNKNOWN_ROLE");
    }
}
