use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Error;
use crate::hooks::EventDispatcher;
use crate::middleware::{LoginValidator, LoginValidatorDyn, Middleware};

/// Environment variable naming the host configuration file for [`Context::from_env`].
pub const CONFIG_PATH_ENV: &str = "AUTH_SIMPLE_CONFIG";

/// Host context handed to every plugin entry point.
///
/// Holds the host configuration document together with the runtime
/// capabilities that cannot be expressed in it: the event dispatcher, named
/// middleware referenced from `loginMiddleware` / `logoutMiddleware`, and the
/// login validator.
///
/// ```rust,ignore
/// let context = Context::from_env()?
///     .with_hooks(Arc::new(host_hooks))
///     .with_middleware("csrf", csrf_middleware)
///     .with_login_validator(MyValidator::new(pool));
/// ```
#[derive(Clone, Default)]
pub struct Context {
    config: Value,
    hooks: Option<Arc<dyn EventDispatcher>>,
    middleware: HashMap<String, Middleware>,
    validate_login: Option<Arc<dyn LoginValidatorDyn>>,
}

impl Context {
    /// Create a context around a host configuration document.
    #[must_use]
    pub fn new(config: Value) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parse the host configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the document is not valid JSON.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config = serde_json::from_str(json).map_err(|e| Error::Load(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Read the host configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Load(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Read the host configuration from the file named by `AUTH_SIMPLE_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the variable is unset or the file is unusable.
    pub fn from_env() -> Result<Self, Error> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_err(|_| Error::Load(format!("{CONFIG_PATH_ENV} is required")))?;
        Self::from_file(path)
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn EventDispatcher>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Register a middleware under the name used in the plugin section.
    #[must_use]
    pub fn with_middleware(mut self, name: impl Into<String>, middleware: Middleware) -> Self {
        self.middleware.insert(name.into(), middleware);
        self
    }

    #[must_use]
    pub fn with_login_validator(mut self, validator: impl LoginValidator) -> Self {
        self.validate_login = Some(Arc::new(validator));
        self
    }

    /// The host configuration document.
    #[must_use]
    pub fn config(&self) -> &Value {
        &self.config
    }

    pub(crate) fn hooks(&self) -> Option<&Arc<dyn EventDispatcher>> {
        self.hooks.as_ref()
    }

    pub(crate) fn middleware(&self, name: &str) -> Option<&Middleware> {
        self.middleware.get(name)
    }

    pub(crate) fn login_validator(&self) -> Option<Arc<dyn LoginValidatorDyn>> {
        self.validate_login.clone()
    }

    pub(crate) fn has_login_validator(&self) -> bool {
        self.validate_login.is_some()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut middleware: Vec<_> = self.middleware.keys().collect();
        middleware.sort();
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("hooks", &self.hooks.is_some())
            .field("middleware", &middleware)
            .field("validate_login", &self.validate_login.is_some())
            .finish()
    }
}
