use std::fmt;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde_json::Value;

use crate::context::Context;
use crate::error::Error;

/// Key of this plugin's section in the host configuration document.
pub const CONFIG_KEY: &str = "uttori-plugin-auth-simple";

/// Method name → event names the method should be subscribed to.
///
/// Entries keep the order of the configuration document, so subscriptions are
/// made in the order the host wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTable(Vec<(String, Vec<String>)>);

impl EventTable {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(method, events)| (method.as_str(), events.as_slice()))
    }

    /// Event names listed for `method`.
    pub fn get(&self, method: &str) -> Option<&[String]> {
        self.iter()
            .find(|(name, _)| *name == method)
            .map(|(_, events)| events)
    }
}

impl<'de> Deserialize<'de> for EventTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = EventTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of method names to event name lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<EventTable, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(EventTable(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Resolved plugin settings: static defaults merged with the host's overrides.
///
/// Resolution is cheap and never cached. Call [`Settings::resolve`] wherever the
/// settings are needed so every call site sees the same merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub events: Option<EventTable>,
    pub login_path: String,
    pub login_redirect_path: String,
    pub login_middleware: Vec<String>,
    pub logout_path: String,
    pub logout_redirect_path: String,
    pub logout_middleware: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            events: None,
            login_path: "/login".into(),
            login_redirect_path: "/".into(),
            login_middleware: Vec::new(),
            logout_path: "/logout".into(),
            logout_redirect_path: "/".into(),
            logout_middleware: Vec::new(),
        }
    }
}

/// Partial view of the plugin section. Absent keys and `null` keep the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Overrides {
    events: Option<EventTable>,
    login_path: Option<String>,
    login_redirect_path: Option<String>,
    login_middleware: Option<Vec<String>>,
    logout_path: Option<String>,
    logout_redirect_path: Option<String>,
    logout_middleware: Option<Vec<String>>,
}

impl Settings {
    /// Merge the defaults with the context's plugin section.
    ///
    /// A missing section resolves to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Section`] if a present key has the wrong type.
    pub fn resolve(context: &Context) -> Result<Self, Error> {
        let overrides = match section(context.config()) {
            Some(section) => Overrides::deserialize(section).map_err(Error::Section)?,
            None => Overrides::default(),
        };
        Ok(Self::default().merge(overrides))
    }

    fn merge(self, overrides: Overrides) -> Self {
        Self {
            events: overrides.events.or(self.events),
            login_path: overrides.login_path.unwrap_or(self.login_path),
            login_redirect_path: overrides
                .login_redirect_path
                .unwrap_or(self.login_redirect_path),
            login_middleware: overrides.login_middleware.unwrap_or(self.login_middleware),
            logout_path: overrides.logout_path.unwrap_or(self.logout_path),
            logout_redirect_path: overrides
                .logout_redirect_path
                .unwrap_or(self.logout_redirect_path),
            logout_middleware: overrides
                .logout_middleware
                .unwrap_or(self.logout_middleware),
        }
    }
}

fn section(config: &Value) -> Option<&Value> {
    config
        .get(CONFIG_KEY)
        .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
}

/// Check the raw plugin section for required entries.
///
/// Fields are checked in a fixed order and the first violation is returned.
/// Defaults are not merged in: a host that runs this check must spell out
/// every field.
///
/// # Errors
///
/// Returns the [`Error`] variant naming the first offending field.
pub fn validate_config(context: &Context) -> Result<(), Error> {
    tracing::debug!("Validating config...");

    let result = check_section(context);
    match &result {
        Ok(()) => tracing::debug!("Validated config."),
        Err(e) => tracing::debug!(error = %e, "Config validation failed"),
    }
    result
}

fn check_section(context: &Context) -> Result<(), Error> {
    let section = section(context.config()).ok_or(Error::MissingConfigKey)?;

    let route = |key: &str| {
        section
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    let list = |key: &str| section.get(key).is_some_and(Value::is_array);

    if !route("loginPath") {
        return Err(Error::LoginPath);
    }
    if !route("loginRedirectPath") {
        return Err(Error::LoginRedirectPath);
    }
    if !list("loginMiddleware") {
        return Err(Error::LoginMiddleware);
    }
    if !route("logoutPath") {
        return Err(Error::LogoutPath);
    }
    if !route("logoutRedirectPath") {
        return Err(Error::LogoutRedirectPath);
    }
    if !list("logoutMiddleware") {
        return Err(Error::LogoutMiddleware);
    }
    if !context.has_login_validator() {
        return Err(Error::ValidateLogin);
    }
    Ok(())
}
