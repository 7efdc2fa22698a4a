//! Catalog domain models
//!
//! Users, data sources and the notes users attach to sources. Each model
//! serializes to the flat record layout the store keeps; the store and the
//! engine only ever see records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_roles::Role;

use crate::error::{CatalogError, CatalogResult};
use crate::store::Record;

/// A model the catalog can store.
pub trait Model: Serialize {
    /// Model name, also the store collection.
    const NAME: &'static str;

    /// The model's identity.
    fn id(&self) -> Uuid;

    /// Serialize into the stored record layout.
    fn to_record(&self) -> CatalogResult<Record> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(record) => Ok(record),
            other => Err(CatalogError::Storage(format!(
                "{} did not serialize to an object: {other}",
                Self::NAME
            ))),
        }
    }
}

/// A catalog user.
///
/// # Examples
///
/// ```
/// use warden_catalog::models::User;
/// use warden_roles::Role;
///
/// let user = User::new("Ann", "ann@example.org", Role::new("basic"));
/// assert_eq!(user.role.as_str(), "basic");
/// assert!(!user.api_key.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Contact address
    pub email: String,

    /// Role granted to the user's API key
    pub role: Role,

    /// Secret API key
    #[serde(rename = "_api_key")]
    pub api_key: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a fresh id and API key.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            email: email.into(),
            role,
            api_key: Uuid::now_v7().simple().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Model for User {
    const NAME: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A data source listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Unique source ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Where the data lives
    pub url: String,

    /// Submitting user, if any
    pub user_id: Option<Uuid>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Source {
    /// Create a source with no submitting user.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            url: url.into(),
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the submitting user.
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

impl Model for Source {
    const NAME: &'static str = "Source";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A user's note on a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique note ID
    pub id: Uuid,

    /// Note text
    pub text: String,

    /// Source the note is attached to
    pub source_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a note by `user_id` on `source_id`.
    pub fn new(text: impl Into<String>, source_id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            text: text.into(),
            source_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Model for Note {
    const NAME: &'static str = "Note";

    fn id(&self) -> Uuid {
        self.id
    }
}
