//! # Actions
//!
//! Defines the actions a resource can be asked to perform and the direction
//! (read or write) each action implies for individual properties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions that can be performed on a resource.
///
/// - **List**: Query many documents
/// - **Read**: View a single document
/// - **Create**: Create a new document
/// - **Update**: Modify an existing document
/// - **Delete**: Remove a document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// List/query documents.
    List,

    /// Read one document.
    Read,

    /// Create a document.
    Create,

    /// Update a document.
    Update,

    /// Delete a document.
    Delete,
}

/// Direction of property access implied by an action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Property may appear in responses.
    Read,

    /// Property may be submitted as a parameter.
    Write,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use warden_resource::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("index"), Some(Action::List));
    /// assert_eq!(Action::parse("destroy"), Some(Action::Delete));
    /// assert_eq!(Action::parse("approve"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "list" | "index" => Some(Action::List),
            "read" | "show" | "get" => Some(Action::Read),
            "create" | "new" => Some(Action::Create),
            "update" | "edit" => Some(Action::Update),
            "delete" | "destroy" | "remove" => Some(Action::Delete),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> [Self; 5] {
        [
            Action::List,
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
        ]
    }

    /// Actions covered by the `modify` permission shorthand.
    pub fn modifying() -> [Self; 3] {
        [Action::Create, Action::Update, Action::Delete]
    }

    /// Property access direction implied by this action.
    ///
    /// `list` and `read` look at properties for reading; `create`, `update`
    /// and `delete` look at them for writing.
    ///
    /// # Example
    ///
    /// ```
    /// use warden_resource::actions::{Access, Action};
    ///
    /// assert_eq!(Action::List.access(), Access::Read);
    /// assert_eq!(Action::Delete.access(), Access::Write);
    /// ```
    pub fn access(&self) -> Access {
        match self {
            Action::List | Action::Read => Access::Read,
            Action::Create | Action::Update | Action::Delete => Access::Write,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Access {
    /// Get the string representation of the access direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
        }
    }

    /// Parse an access direction, accepting the `r`/`w` shorthand.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "r" | "read" => Some(Access::Read),
            "w" | "write" => Some(Access::Write),
            _ => None,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
