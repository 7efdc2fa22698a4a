//! Documents handed to warden by the storage layer
//!
//! Warden never loads documents itself. The embedding application fetches
//! them and exposes each one through the [`Document`] trait.

use serde_json::{Map, Value};
use std::any::Any;

/// A stored document, as seen by authorization and projection.
///
/// # Examples
///
/// ```
/// use serde_json::{json, Map, Value};
/// use warden_resource::Document;
///
/// let doc: Map<String, Value> = serde_json::from_value(json!({
///     "_id": "4b1f",
///     "title": "Census 2010",
/// })).unwrap();
///
/// assert_eq!(doc.id(), "4b1f");
/// assert_eq!(doc.attribute("title"), Some(json!("Census 2010")));
/// assert_eq!(doc.attribute("missing"), None);
/// ```
pub trait Document: Send + Sync {
    /// The document's identity field.
    fn id(&self) -> String;

    /// The value of a named attribute, if the document has one.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Access the concrete type, e.g. for ownership checks or custom readers.
    fn as_any(&self) -> &dyn Any;
}

impl Document for Map<String, Value> {
    /// Reads `_id`, falling back to `id`.
    fn id(&self) -> String {
        match self.get("_id").or_else(|| self.get("id")) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
