//! Lifecycle callbacks
//!
//! Resources may register one handler per lifecycle event. A handler receives
//! a [`CallbackContext`] carrying the document and parent document when they
//! are available.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::document::Document;

/// Lifecycle events a resource can hook into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallbackEvent {
    /// Before a document is created
    BeforeCreate,
    /// After a document is created
    AfterCreate,
    /// Before a document is updated
    BeforeUpdate,
    /// After a document is updated
    AfterUpdate,
    /// Before a document is destroyed
    BeforeDestroy,
    /// After a document is destroyed
    AfterDestroy,
}

impl CallbackEvent {
    /// Get the string representation of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackEvent::BeforeCreate => "before_create",
            CallbackEvent::AfterCreate => "after_create",
            CallbackEvent::BeforeUpdate => "before_update",
            CallbackEvent::AfterUpdate => "after_update",
            CallbackEvent::BeforeDestroy => "before_destroy",
            CallbackEvent::AfterDestroy => "after_destroy",
        }
    }

    /// Parse an event name such as `before_create`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "before_create" => Some(CallbackEvent::BeforeCreate),
            "after_create" => Some(CallbackEvent::AfterCreate),
            "before_update" => Some(CallbackEvent::BeforeUpdate),
            "after_update" => Some(CallbackEvent::AfterUpdate),
            "before_destroy" => Some(CallbackEvent::BeforeDestroy),
            "after_destroy" => Some(CallbackEvent::AfterDestroy),
            _ => None,
        }
    }
}

impl fmt::Display for CallbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a handler gets to see.
#[derive(Clone, Copy)]
pub struct CallbackContext<'a> {
    /// The event being fired
    pub event: CallbackEvent,
    /// Path of the resource firing the event
    pub resource: &'a str,
    /// The document being acted on, if any
    pub document: Option<&'a dyn Document>,
    /// The parent document of a nested resource, if any
    pub parent_document: Option<&'a dyn Document>,
}

impl fmt::Debug for CallbackContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackContext")
            .field("event", &self.event)
            .field("resource", &self.resource)
            .field("document", &self.document.map(|d| d.id()))
            .field("parent_document", &self.parent_document.map(|d| d.id()))
            .finish()
    }
}

/// Failure reported by a callback handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{event} callback failed: {message}")]
pub struct CallbackError {
    /// Event whose handler failed.
    pub event: CallbackEvent,
    /// Handler-supplied message.
    pub message: String,
}

impl CallbackError {
    /// Create a new callback error.
    pub fn new(event: CallbackEvent, message: impl Into<String>) -> Self {
        Self {
            event,
            message: message.into(),
        }
    }
}

/// A registered lifecycle handler.
pub type CallbackHandler =
    Arc<dyn Fn(&CallbackContext<'_>) -> Result<(), CallbackError> + Send + Sync>;
