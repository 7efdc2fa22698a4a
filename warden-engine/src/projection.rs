//! Projection
//!
//! Reduces stored documents to the properties a role may read. A property
//! the role cannot read is left out of the output entirely.

use serde_json::{Map, Value};
use warden_resource::{Action, Document, PropertyRule, ResourceConfig};
use warden_roles::Role;

use crate::application::Application;
use crate::authorize;
use crate::engine::ResourceEngine;
use crate::error::EngineResult;

/// A document projected for one role: property name to value.
pub type Projection = Map<String, Value>;

/// Property whose value is the document's identity field.
pub const ID_PROPERTY: &str = "id";

impl<A: Application> ResourceEngine<A> {
    /// Project `document` into the properties `role` may read.
    ///
    /// Values come from the property's custom reader when one is declared,
    /// otherwise from the attribute of the same name. `id` maps to the
    /// document's identity field.
    pub fn build_resource(
        &self,
        role: &Role,
        document: &dyn Document,
        config: &ResourceConfig,
    ) -> EngineResult<Projection> {
        let mut projection = Projection::new();
        for (property, rule) in config.properties() {
            if authorize::authorized(Action::Read, role, config, Some(property))? {
                projection.insert(property.to_string(), value(property, document, rule));
            }
        }

        tracing::debug!(
            resource = %config.path(),
            role = %role,
            document = %document.id(),
            properties = projection.len(),
            "Built resource"
        );
        Ok(projection)
    }

    /// Project each document under the actor's role relative to that document.
    ///
    /// The role is resolved per document through
    /// [`Application::lookup_role`], so an owner sees more of their own
    /// documents than of anyone else's in the same list. `None` entries are
    /// skipped.
    pub fn build_resources<'a, I, D>(
        &self,
        documents: I,
        config: &ResourceConfig,
    ) -> EngineResult<Vec<Projection>>
    where
        I: IntoIterator<Item = D>,
        D: Into<Option<&'a dyn Document>>,
    {
        documents
            .into_iter()
            .filter_map(Into::<Option<&'a dyn Document>>::into)
            .map(|document| {
                let role = self.app().lookup_role(Some(document))?;
                self.build_resource(&role, document, config)
            })
            .collect()
    }
}

fn value(property: &str, document: &dyn Document, rule: &PropertyRule) -> Value {
    if let Some(reader) = rule.reader() {
        return reader(document);
    }
    if property == ID_PROPERTY {
        return Value::String(document.id());
    }
    document.attribute(property).unwrap_or(Value::Null)
}
