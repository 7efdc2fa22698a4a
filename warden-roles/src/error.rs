//! Error types for role declarations
//!
//! Every error in this module is a configuration error: it is raised while
//! roles are declared or when a resource refers to a role that does not exist.

use thiserror::Error;

/// Role hierarchy error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    /// The role was declared twice
    #[error("Role already declared: {0}")]
    DuplicateRole(String),

    /// A parent role was referenced before it was declared
    #[error("Unknown parent role {parent} for role {role}")]
    UnknownParent {
        /// Role being declared.
        role: String,
        /// Parent that does not exist yet.
        parent: String,
    },

    /// The role is not a member of the hierarchy
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The name is reserved and cannot be declared
    #[error("Role name is reserved: {0}")]
    ReservedRole(String),
}

/// Result type for role operations.
pub type RoleResult<T> = Result<T, RoleError>;

impl RoleError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RoleError::DuplicateRole(_) => "DUPLICATE_ROLE",
            RoleError::UnknownParent { .. } => "UNKNOWN_PARENT",
            RoleError::UnknownRole(_) => "UNKNOWN_ROLE",
            RoleError::ReservedRole(_) => "RESERVED_ROLE",
        }
    }
}
