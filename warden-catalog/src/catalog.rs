//! Request handling
//!
//! [`Catalog`] owns the store and the mounted resources, and runs each
//! [`Request`] through the engine: resolve the role, check the action and
//! its parameters, touch the store, then project and shape the response.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use warden_engine::{
    Application, EngineError, EngineSettings, ErrorBody, Params, ResourceEngine, Response,
};
use warden_resource::{Action, CallbackEvent, Document, ResourceConfig, ResourceRegistry};
use warden_roles::{Role, RoleHierarchy};

use crate::app::CatalogApp;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::query::ListQuery;
use crate::resources;
use crate::roles::catalog_roles;
use crate::store::{CatalogStore, Record};

/// A request, already routed.
#[derive(Debug, Clone)]
pub struct Request {
    /// Requested action.
    pub action: Action,
    /// Mount path of the target resource.
    pub resource: String,
    /// Document id, for read, update and delete.
    pub id: Option<String>,
    /// Parent document id, for nested resources.
    pub parent_id: Option<String>,
    /// Request parameters, including the API key.
    pub params: Params,
}

impl Request {
    /// Request `action` on the resource mounted at `resource`.
    pub fn new(action: Action, resource: impl Into<String>) -> Self {
        Self {
            action,
            resource: resource.into(),
            id: None,
            parent_id: None,
            params: Params::new(),
        }
    }

    /// Target a single document.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Target a nested resource under the parent document `parent_id`.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set one parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// The data catalog application.
pub struct Catalog {
    store: Arc<CatalogStore>,
    config: Arc<CatalogConfig>,
    settings: EngineSettings,
    roles: Arc<RoleHierarchy>,
    registry: ResourceRegistry,
    associations: Arc<HashMap<String, String>>,
}

impl Catalog {
    /// Create a catalog with an empty store.
    ///
    /// # Errors
    ///
    /// Configuration errors, or a resource declaration that fails to build.
    pub fn new(config: CatalogConfig, settings: EngineSettings) -> CatalogResult<Self> {
        config.validate()?;
        settings.validate()?;

        let store = Arc::new(CatalogStore::new());
        let roles = catalog_roles()?;
        let registry = ResourceRegistry::new();
        resources::register_all(&registry, Arc::clone(&roles), Arc::clone(&store))?;

        let associations = registry
            .paths()
            .into_iter()
            .filter_map(|path| registry.get(&path))
            .filter_map(|config| {
                let parent = config.parent()?;
                Some((
                    config.path().to_string(),
                    format!("{}_id", parent.model.to_lowercase()),
                ))
            })
            .collect();

        tracing::info!(resources = ?registry.paths(), "Catalog ready");
        Ok(Self {
            store,
            config: Arc::new(config),
            settings,
            roles,
            registry,
            associations: Arc::new(associations),
        })
    }

    /// Create a catalog from environment configuration.
    pub fn from_env() -> CatalogResult<Self> {
        Self::new(CatalogConfig::from_env(), EngineSettings::from_env())
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// The mounted resources.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Build an engine for one request, taking the API key out of `params`.
    pub fn engine_for(&self, params: &mut Params) -> CatalogResult<ResourceEngine<CatalogApp>> {
        let api_key = match params.remove(&self.config.api_key_param) {
            Some(Value::String(key)) => Some(key),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        let app = CatalogApp::new(
            Arc::clone(&self.store),
            Arc::clone(&self.config),
            Arc::clone(&self.roles),
            Arc::clone(&self.associations),
            api_key,
        );
        Ok(ResourceEngine::with_settings(app, self.settings.clone())?)
    }

    /// Handle `request`, turning every failure into an error response.
    pub async fn respond(&self, mut request: Request) -> Response {
        let mut params = std::mem::take(&mut request.params);
        let engine = match self.engine_for(&mut params) {
            Ok(engine) => engine,
            Err(err) => return plain_error(&err),
        };

        match self.dispatch(&engine, request, params).await {
            Ok(response) => response,
            Err(err) => error_response(&engine, &err),
        }
    }

    /// Handle `request`, returning failures as errors.
    pub async fn handle(&self, mut request: Request) -> CatalogResult<Response> {
        let mut params = std::mem::take(&mut request.params);
        let engine = self.engine_for(&mut params)?;
        self.dispatch(&engine, request, params).await
    }

    async fn dispatch(
        &self,
        engine: &ResourceEngine<CatalogApp>,
        request: Request,
        params: Params,
    ) -> CatalogResult<Response> {
        let Request {
            action,
            resource,
            id,
            parent_id,
            ..
        } = request;
        let config = self
            .registry
            .get(&resource)
            .ok_or_else(|| CatalogError::UnknownResource(resource.clone()))?;

        // The parent segment is authorized first, and a missing parent is
        // reported before the leaf is looked at.
        let parent = match config.parent() {
            Some(parent) => {
                let parent_id = parent_id
                    .as_deref()
                    .ok_or_else(|| EngineError::MissingParentId(config.path().to_string()))?;
                let parent_config = self
                    .registry
                    .get(&parent.path)
                    .ok_or_else(|| CatalogError::UnknownResource(parent.path.clone()))?;

                let found = engine.app().find_document(parent_config.model(), parent_id).await?;
                let role = engine.app().lookup_role(found.as_deref())?;
                engine.check_permission(Action::Read, &role, &parent_config)?;
                engine.check_params(Action::Read, &role, &parent_config, &params, false)?;
                let found = found.ok_or_else(|| not_found(&parent_config, parent_id))?;
                Some(found)
            }
            None => None,
        };
        let parent_doc = parent.as_deref();

        // Leaf lookups run before authorization; a missing document is
        // reported only once the actor is known to be allowed to ask.
        let document = match (&id, parent_doc) {
            (Some(id), Some(parent)) => {
                engine
                    .app()
                    .find_nested_document(parent, config.path(), config.model(), id)
                    .await?
            }
            (Some(id), None) => engine.app().find_document(config.model(), id).await?,
            (None, _) => None,
        };

        let role = acting_role(engine, action, &config, document.as_deref())?;
        engine.check_permission(action, &role, &config)?;
        engine.check_params(action, &role, &config, &params, true)?;

        if let (Some(id), None) = (&id, &document) {
            return Err(not_found(&config, id));
        }

        match (action, document) {
            (Action::List, _) => {
                let query = ListQuery::from_params(&params, engine.settings())?;
                let records = self.list(&config, parent_doc);
                // Matching runs on projections: nobody filters on what they cannot read.
                let projections = engine.build_resources(
                    records.iter().map(|record| record as &dyn Document),
                    &config,
                )?;
                let members = Value::Array(
                    projections
                        .into_iter()
                        .filter(|projection| query.matches(projection))
                        .map(Value::Object)
                        .collect(),
                );
                Ok(engine.display(action, &members, &config, parent_id.as_deref())?)
            }
            (Action::Read, Some(document)) => {
                let projection = engine.build_resource(&role, document.as_ref(), &config)?;
                Ok(engine.display(action, &Value::Object(projection), &config, None)?)
            }
            (Action::Create, None) => {
                let record = self.create(engine, &config, parent_doc, params)?;
                let role = engine.app().lookup_role(Some(&record))?;
                let projection = engine.build_resource(&role, &record, &config)?;
                Ok(engine.display(
                    action,
                    &Value::Object(projection),
                    &config,
                    parent_id.as_deref(),
                )?)
            }
            (Action::Update, Some(document)) => {
                engine.do_callback(
                    CallbackEvent::BeforeUpdate,
                    &config,
                    Some(document.as_ref()),
                    parent_doc,
                )?;
                let record = self
                    .store
                    .update(config.model(), &document.id(), &params)
                    .ok_or_else(|| not_found(&config, &document.id()))?;
                engine.do_callback(CallbackEvent::AfterUpdate, &config, Some(&record), parent_doc)?;

                let projection = engine.build_resource(&role, &record, &config)?;
                Ok(engine.display(action, &Value::Object(projection), &config, None)?)
            }
            (Action::Delete, Some(document)) => {
                engine.do_callback(
                    CallbackEvent::BeforeDestroy,
                    &config,
                    Some(document.as_ref()),
                    parent_doc,
                )?;
                let removed = self
                    .store
                    .remove(config.model(), &document.id())
                    .ok_or_else(|| not_found(&config, &document.id()))?;
                engine.do_callback(CallbackEvent::AfterDestroy, &config, Some(&removed), parent_doc)?;
                Ok(engine.display(action, &Value::Null, &config, None)?)
            }
            (Action::Create, Some(_)) => Err(CatalogError::Engine(EngineError::BadRequest(
                ErrorBody::Errors(Value::String("cannot create with an id".to_string())),
            ))),
            (Action::Read | Action::Update | Action::Delete, None) => {
                Err(CatalogError::Engine(EngineError::BadRequest(ErrorBody::Errors(
                    Value::String(format!("{action} needs an id")),
                ))))
            }
        }
    }

    fn list(&self, config: &ResourceConfig, parent: Option<&dyn Document>) -> Vec<Record> {
        match (parent, self.associations.get(config.path())) {
            (Some(parent), Some(foreign_key)) => {
                self.store
                    .find_all_by(config.model(), foreign_key, &Value::String(parent.id()))
            }
            _ => self.store.all(config.model()),
        }
    }

    fn create(
        &self,
        engine: &ResourceEngine<CatalogApp>,
        config: &ResourceConfig,
        parent: Option<&dyn Document>,
        params: Map<String, Value>,
    ) -> CatalogResult<Record> {
        engine.do_callback(CallbackEvent::BeforeCreate, config, None, parent)?;

        let mut fields = params;
        if let (Some(parent), Some(foreign_key)) = (parent, self.associations.get(config.path())) {
            fields.insert(foreign_key.clone(), Value::String(parent.id()));
        }
        if config.property("user_id").is_some() && !fields.contains_key("user_id") {
            if let Some(user) = engine.app().current_user()? {
                fields.insert("user_id".to_string(), Value::String(user.id()));
            }
        }

        let record = self.store.create(config.model(), &fields)?;
        engine.do_callback(CallbackEvent::AfterCreate, config, Some(&record), parent)?;
        Ok(record)
    }
}

/// The role the actor acts under for `action` on `document`.
///
/// Ownership can be granted on a document whose owner also holds an unrelated
/// stored role, such as a curator's own source. The relative role is tried
/// first and the stored role second.
fn acting_role(
    engine: &ResourceEngine<CatalogApp>,
    action: Action,
    config: &ResourceConfig,
    document: Option<&dyn Document>,
) -> CatalogResult<Role> {
    let relative = engine.app().lookup_role(document)?;
    if document.is_none() || engine.authorized(action, &relative, config, None)? {
        return Ok(relative);
    }

    let stored = engine.app().stored_role()?;
    if stored != relative && engine.authorized(action, &stored, config, None)? {
        return Ok(stored);
    }
    Ok(relative)
}

fn not_found(config: &ResourceConfig, id: &str) -> CatalogError {
    CatalogError::NotFound {
        model: config.model().to_string(),
        id: id.to_string(),
    }
}

fn error_response(engine: &ResourceEngine<CatalogApp>, err: &CatalogError) -> Response {
    match err {
        CatalogError::Engine(EngineError::Callback(callback)) => {
            let body = ErrorBody::Errors(Value::Array(vec![Value::String(
                callback.message.clone(),
            )]));
            Response {
                status: err.status_code(),
                location: None,
                body: engine
                    .app()
                    .convert(&body.to_value())
                    .unwrap_or_default(),
            }
        }
        CatalogError::Engine(inner) => engine
            .error_response(inner)
            .unwrap_or_else(|_| plain_error(err)),
        _ => plain_error(err),
    }
}

fn plain_error(err: &CatalogError) -> Response {
    if err.is_server_error() {
        tracing::error!(error = %err, code = err.error_code(), "Request failed");
    }
    Response {
        status: err.status_code(),
        location: None,
        body: String::new(),
    }
}
