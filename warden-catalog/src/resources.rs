//! Catalog resource declarations
//!
//! | Path                  | Model  | list/read | create  | update  | delete  |
//! |-----------------------|--------|-----------|---------|---------|---------|
//! | `users`               | User   | basic     | owner   | owner   | owner   |
//! | `sources`             | Source | basic     | curator | curator | admin   |
//! | `sources/:id/notes`   | Note   | basic     | basic   | owner   | owner   |

use serde_json::{json, Value};
use std::sync::Arc;
use warden_resource::{
    Access, Action, CallbackError, CallbackEvent, Document, ResourceConfig, ResourceRegistry,
    ResourceResult,
};
use warden_roles::{Role, RoleHierarchy};

use crate::models::{Model, Note, Source, User};
use crate::roles::{ADMIN, BASIC, CURATOR, OWNER};
use crate::store::CatalogStore;

/// Mount path of the users resource.
pub const USERS: &str = "users";
/// Mount path of the sources resource.
pub const SOURCES: &str = "sources";
/// Mount path of the notes resource, nested under sources.
pub const NOTES: &str = "notes";

/// Users. Everyone sees names; only the user and admins see the rest.
pub fn users(roles: Arc<RoleHierarchy>) -> ResourceResult<ResourceConfig> {
    let mut builder = ResourceConfig::builder(USERS);
    builder
        .set_model(User::NAME)?
        .set_roles(roles)?
        .set_permission(Action::List, BASIC)
        .set_permission(Action::Read, BASIC)
        .set_modify_permission(OWNER)
        .set_property("name", Access::Read, BASIC)
        .set_property("name", Access::Write, OWNER)
        .set_property("email", Access::Read, OWNER)
        .set_property("email", Access::Write, OWNER)
        .set_property("role", Access::Read, OWNER)
        .set_property("role", Access::Write, ADMIN)
        .set_property("id", Access::Read, BASIC)
        .set_property("id", Access::Write, Role::NOBODY)
        .set_property("created_at", Access::Read, OWNER)
        .set_property("updated_at", Access::Read, OWNER);
    builder.build()
}

/// Data sources, curated by curators. `note_count` is computed from the store.
pub fn sources(
    roles: Arc<RoleHierarchy>,
    store: Arc<CatalogStore>,
) -> ResourceResult<ResourceConfig> {
    let counter = Arc::clone(&store);
    let guard = store;

    let mut builder = ResourceConfig::builder(SOURCES);
    builder
        .set_model(Source::NAME)?
        .set_roles(roles)?
        .set_permission(Action::List, BASIC)
        .set_permission(Action::Read, BASIC)
        .set_permission(Action::Create, CURATOR)
        .set_permission(Action::Update, CURATOR)
        .set_permission(Action::Delete, ADMIN)
        .set_property("id", Access::Read, BASIC)
        .set_property("title", Access::Read, BASIC)
        .set_property("title", Access::Write, CURATOR)
        .set_property("url", Access::Read, BASIC)
        .set_property("url", Access::Write, CURATOR)
        .set_property("user_id", Access::Read, BASIC)
        .set_property("user_id", Access::Write, ADMIN)
        .set_property("note_count", Access::Read, BASIC)
        .set_property_reader("note_count", move |source: &dyn Document| {
            json!(notes_of(&counter, source).len())
        })
        .set_property("created_at", Access::Read, BASIC)
        .set_property("updated_at", Access::Read, BASIC)
        .register_callback(CallbackEvent::BeforeDestroy, move |ctx| {
            let Some(source) = ctx.document else {
                return Ok(());
            };
            let notes = notes_of(&guard, source).len();
            if notes > 0 {
                return Err(CallbackError::new(
                    ctx.event,
                    format!("source {} still has {notes} notes", source.id()),
                ));
            }
            Ok(())
        });
    builder.build()
}

/// Notes on a source. Any user may write one; only its author may change it.
pub fn notes(
    roles: Arc<RoleHierarchy>,
    sources: &ResourceConfig,
) -> ResourceResult<ResourceConfig> {
    let mut builder = ResourceConfig::builder(NOTES);
    builder
        .set_model(Note::NAME)?
        .set_roles(roles)?
        .set_parent(sources)
        .set_permission(Action::List, BASIC)
        .set_permission(Action::Read, BASIC)
        .set_permission(Action::Create, BASIC)
        .set_permission(Action::Update, OWNER)
        .set_permission(Action::Delete, OWNER)
        .set_property("id", Access::Read, BASIC)
        .set_property("text", Access::Read, BASIC)
        .set_property("text", Access::Write, BASIC)
        .set_property("source_id", Access::Read, BASIC)
        .set_property("user_id", Access::Read, BASIC)
        .set_property("created_at", Access::Read, BASIC)
        .set_property("updated_at", Access::Read, OWNER)
        .register_callback(CallbackEvent::BeforeCreate, |ctx| {
            if ctx.parent_document.is_none() {
                return Err(CallbackError::new(ctx.event, "notes need a source"));
            }
            Ok(())
        })
        .register_callback(CallbackEvent::AfterCreate, |ctx| {
            tracing::info!(
                note = ?ctx.document.map(|d| d.id()),
                source = ?ctx.parent_document.map(|d| d.id()),
                "Note added"
            );
            Ok(())
        });
    builder.build()
}

/// Register every catalog resource.
pub fn register_all(
    registry: &ResourceRegistry,
    roles: Arc<RoleHierarchy>,
    store: Arc<CatalogStore>,
) -> ResourceResult<()> {
    registry.register(users(Arc::clone(&roles))?)?;
    let sources = registry.register(sources(Arc::clone(&roles), store)?)?;
    registry.register(notes(roles, &sources)?)?;
    Ok(())
}

fn notes_of(store: &CatalogStore, source: &dyn Document) -> Vec<crate::store::Record> {
    store.find_all_by(Note::NAME, "source_id", &Value::String(source.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::catalog_roles;

    #[test]
    fn test_register_all() {
        let registry = ResourceRegistry::new();
        register_all(
            &registry,
            catalog_roles().unwrap(),
            Arc::new(CatalogStore::new()),
        )
        .unwrap();

        assert_eq!(registry.paths(), vec!["notes", "sources", "users"]);
        let notes = registry.get(NOTES).unwrap();
        let parent = notes.parent().unwrap();
        assert_eq!(parent.path, SOURCES);
        assert_eq!(parent.model, "Source");
    }

    #[test]
    fn test_users_permissions() {
        let config = users(catalog_roles().unwrap()).unwrap();
        assert_eq!(config.permission(Action::Read), Some(&Role::new(BASIC)));
        for action in Action::modifying() {
            assert_eq!(config.permission(action), Some(&Role::new(OWNER)));
        }
        assert_eq!(
            config.property("id").unwrap().minimum(Access::Write),
            Role::NOBODY
        );
        assert_eq!(
            config.property("created_at").unwrap().minimum(Access::Write),
            Role::NOBODY
        );
    }

    #[test]
    fn test_source_refuses_delete_with_notes() {
        let store = Arc::new(CatalogStore::new());
        let config = sources(catalog_roles().unwrap(), Arc::clone(&store)).unwrap();
        let source = Source::new("Census", "http://census.gov");
        let record = store.insert(&source).unwrap();

        let handler = config.callback(CallbackEvent::BeforeDestroy).unwrap();
        let ctx = warden_resource::CallbackContext {
            event: CallbackEvent::BeforeDestroy,
            resource: SOURCES,
            document: Some(&record),
            parent_document: None,
        };
        assert!(handler(&ctx).is_ok());

        store
            .insert(&Note::new("Stale", source.id, uuid::Uuid::now_v7()))
            .unwrap();
        assert!(handler(&ctx).is_err());
    }
}
