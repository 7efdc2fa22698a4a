//! Request checks
//!
//! [`ResourceEngine`] ties an [`Application`] to the authorization rules of
//! each resource. This module holds the checks a dispatcher runs before it
//! reads or mutates anything: permission, parameters, relative roles and
//! lifecycle callbacks.

use serde_json::{Map, Value};
use warden_resource::{Action, CallbackContext, CallbackEvent, Document, ResourceConfig};
use warden_roles::Role;

use crate::application::Application;
use crate::authorize;
use crate::body::ErrorBody;
use crate::error::{EngineError, EngineResult};
use crate::settings::EngineSettings;

/// Request parameters, already parsed by the router.
pub type Params = Map<String, Value>;

/// Authorization and projection engine for one application.
///
/// The engine holds no per-request state. One instance can serve every
/// resource of an application from many threads at once.
pub struct ResourceEngine<A> {
    app: A,
    settings: EngineSettings,
}

impl<A: Application> ResourceEngine<A> {
    /// Create an engine with default settings.
    pub fn new(app: A) -> Self {
        Self {
            app,
            settings: EngineSettings::default(),
        }
    }

    /// Create an engine with explicit settings.
    ///
    /// # Errors
    ///
    /// `EngineError::Config` if the settings are invalid.
    pub fn with_settings(app: A, settings: EngineSettings) -> EngineResult<Self> {
        settings.validate()?;
        Ok(Self { app, settings })
    }

    /// The application collaborator.
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// See [`authorize::minimum_role`].
    pub fn minimum_role(
        &self,
        action: Action,
        config: &ResourceConfig,
        property: Option<&str>,
    ) -> EngineResult<Role> {
        authorize::minimum_role(action, config, property)
    }

    /// See [`authorize::authorized`].
    pub fn authorized(
        &self,
        action: Action,
        role: &Role,
        config: &ResourceConfig,
        property: Option<&str>,
    ) -> EngineResult<bool> {
        authorize::authorized(action, role, config, property)
    }

    /// Fail unless `role` may perform `action` on the resource.
    ///
    /// Runs [`Application::before_authorization`] first, so the application
    /// can reject missing or invalid credentials with their own bodies.
    ///
    /// # Errors
    ///
    /// `EngineError::Unauthorized(ErrorBody::Unauthorized)` when the role is
    /// insufficient, or whatever the application hook returns.
    pub fn check_permission(
        &self,
        action: Action,
        role: &Role,
        config: &ResourceConfig,
    ) -> EngineResult<()> {
        self.app.before_authorization(action, role, config)?;

        let decision = authorize::decide(action, role, config, None)?;
        if !decision.permitted {
            tracing::warn!(
                resource = %config.path(),
                action = %action,
                role = %role,
                minimum = %decision.minimum,
                "Permission denied"
            );
            return Err(EngineError::Unauthorized(ErrorBody::Unauthorized));
        }
        Ok(())
    }

    /// Fail unless `params` are acceptable for `action` and `role`.
    ///
    /// Only enforced at the leaf of a nested path (`leaf == true`); simple
    /// resources always pass `true`.
    ///
    /// 1. Shape: `list` and `delete` accept only the filter and search keys,
    ///    `read` accepts nothing, `update` needs at least one parameter.
    /// 2. Every other parameter must be writable by `role`. All offenders are
    ///    reported together.
    ///
    /// # Errors
    ///
    /// `EngineError::BadRequest` with `NonEmptyParams`, `NoParams` or
    /// `InvalidParams`.
    pub fn check_params(
        &self,
        action: Action,
        role: &Role,
        config: &ResourceConfig,
        params: &Params,
        leaf: bool,
    ) -> EngineResult<()> {
        if !leaf {
            return Ok(());
        }
        self.check_params_shape(action, params)?;

        let mut invalid = Vec::new();
        for property in params.keys() {
            if self.settings.is_query_key(property) {
                continue;
            }
            if !authorize::authorized(action, role, config, Some(property.as_str()))? {
                invalid.push(property.clone());
            }
        }

        if !invalid.is_empty() {
            tracing::warn!(
                resource = %config.path(),
                action = %action,
                role = %role,
                params = ?invalid,
                "Rejected unauthorized params"
            );
            return Err(EngineError::BadRequest(ErrorBody::InvalidParams(invalid)));
        }
        Ok(())
    }

    fn check_params_shape(&self, action: Action, params: &Params) -> EngineResult<()> {
        let only_query_keys = || params.keys().all(|key| self.settings.is_query_key(key));
        match action {
            Action::List | Action::Delete if !only_query_keys() => {
                Err(EngineError::BadRequest(ErrorBody::NonEmptyParams))
            }
            Action::Read if !params.is_empty() => {
                Err(EngineError::BadRequest(ErrorBody::NonEmptyParams))
            }
            Action::Update if params.is_empty() => {
                Err(EngineError::BadRequest(ErrorBody::NoParams))
            }
            // Create is checked property by property.
            _ => Ok(()),
        }
    }

    /// Role of the current actor relative to the document `model`/`id`.
    pub async fn role_for(&self, model: &str, id: &str) -> EngineResult<Role> {
        let document = self.app.find_document(model, id).await?;
        self.app.lookup_role(document.as_deref())
    }

    /// Role of the current actor relative to a child of `parent`.
    pub async fn role_for_nested(
        &self,
        parent: &dyn Document,
        child_association: &str,
        child_model: &str,
        child_id: &str,
    ) -> EngineResult<Role> {
        let document = self
            .app
            .find_nested_document(parent, child_association, child_model, child_id)
            .await?;
        self.app.lookup_role(document.as_deref())
    }

    /// Run the handler registered for `event`, if any.
    pub fn do_callback(
        &self,
        event: CallbackEvent,
        config: &ResourceConfig,
        document: Option<&dyn Document>,
        parent_document: Option<&dyn Document>,
    ) -> EngineResult<()> {
        let Some(handler) = config.callback(event) else {
            return Ok(());
        };

        let context = CallbackContext {
            event,
            resource: config.path(),
            document,
            parent_document,
        };
        tracing::debug!(?context, "Running callback");
        handler(&context)?;
        Ok(())
    }
}
