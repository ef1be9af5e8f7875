//! Data-driven wiring of plugin methods to host events.
//!
//! The host owns the dispatcher. This module only produces subscriptions: the
//! plugin section's `events` table names a plugin method and the events it
//! should run on, and [`register`] looks each method up in a fixed table.

use std::sync::Arc;

use crate::config::{Settings, validate_config};
use crate::context::Context;
use crate::error::Error;
use crate::middleware::{RouteRegistrar, bind_routes};

/// A plugin method the host calls when an event fires.
pub type Hook = fn(&mut HookPayload<'_>) -> Result<(), Error>;

/// Arguments the host passes to a [`Hook`].
pub enum HookPayload<'a> {
    /// Configuration checking at startup.
    ValidateConfig { context: &'a Context },
    /// Route setup on the host server.
    BindRoutes {
        server: &'a mut dyn RouteRegistrar,
        context: &'a Arc<Context>,
    },
}

impl HookPayload<'_> {
    pub fn context(&self) -> &Context {
        match self {
            Self::ValidateConfig { context } => context,
            Self::BindRoutes { context, .. } => context,
        }
    }
}

/// Host-owned publish/subscribe mechanism.
pub trait EventDispatcher: Send + Sync {
    /// Subscribe `hook` to `event`.
    fn on(&self, event: &str, hook: Hook);
}

/// Plugin methods addressable from the `events` table.
const HOOKS: &[(&str, Hook)] = &[
    ("validateConfig", validate_config_hook),
    ("bindRoutes", bind_routes_hook),
];

fn lookup(method: &str) -> Option<Hook> {
    HOOKS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, hook)| *hook)
}

fn validate_config_hook(payload: &mut HookPayload<'_>) -> Result<(), Error> {
    validate_config(payload.context())
}

fn bind_routes_hook(payload: &mut HookPayload<'_>) -> Result<(), Error> {
    match payload {
        HookPayload::BindRoutes { server, context } => bind_routes(&mut **server, *context),
        HookPayload::ValidateConfig { .. } => {
            tracing::debug!("bindRoutes fired without a server, skipping");
            Ok(())
        }
    }
}

/// Subscribe plugin methods to host events as listed in the `events` table.
///
/// Subscriptions are made in document order. Unknown method names are skipped; the same method may be bound to several
/// events.
///
/// # Errors
///
/// - [`Error::MissingDispatcher`] if the context has no dispatcher.
/// - [`Error::MissingEvents`] if the plugin section has no `events` table.
/// - [`Error::Section`] if the plugin section is malformed.
pub fn register(context: &Context) -> Result<(), Error> {
    tracing::debug!("register");
    let hooks = context.hooks().ok_or(Error::MissingDispatcher)?;
    let events = Settings::resolve(context)?
        .events
        .ok_or(Error::MissingEvents)?;

    for (method, names) in events.iter() {
        for event in names {
            match lookup(method) {
                Some(hook) => hooks.on(event, hook),
                None => tracing::debug!(method = %method, event = %event, "Missing hook method"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::config::CONFIG_KEY;

    #[derive(Default)]
    struct Recorder {
        subscribed: Mutex<Vec<String>>,
    }

    impl EventDispatcher for Recorder {
        fn on(&self, event: &str, _hook: Hook) {
            self.subscribed.lock().unwrap().push(event.to_string());
        }
    }

    fn context_with(section: serde_json::Value, hooks: Arc<Recorder>) -> Context {
        Context::new(json!({ CONFIG_KEY: section })).with_hooks(hooks)
    }

    #[test]
    fn register_with_empty_event_list() {
        let hooks = Arc::new(Recorder::default());
        let ctx = context_with(json!({ "events": { "callback": [] } }), hooks.clone());
        register(&ctx).unwrap();
        assert!(hooks.subscribed.lock().unwrap().is_empty());
    }

    #[test]
    fn register_without_dispatcher() {
        let err = register(&Context::default()).unwrap_err();
        assert!(matches!(err, Error::MissingDispatcher));
        assert!(err.to_string().starts_with("Missing event dispatcher"));
    }

    #[test]
    fn register_without_events() {
        let ctx = context_with(json!({}), Arc::new(Recorder::default()));
        let err = register(&ctx).unwrap_err();
        assert!(matches!(err, Error::MissingEvents));
        assert!(err.to_string().starts_with("Missing events to listen to"));
    }

    #[test]
    fn register_skips_unknown_methods() {
        let hooks = Arc::new(Recorder::default());
        let ctx = context_with(
            json!({
                "events": {
                    "test": ["test"],
                    "bindRoutes": ["bind-routes", "rebind-routes"],
                    "validateConfig": ["validate-config"],
                },
            }),
            hooks.clone(),
        );
        register(&ctx).unwrap();

        let subscribed = hooks.subscribed.lock().unwrap().clone();
        assert_eq!(subscribed, ["bind-routes", "rebind-routes", "validate-config"]);
    }

    #[test]
    fn register_follows_document_order() {
        let hooks = Arc::new(Recorder::default());
        let ctx = context_with(
            json!({
                "events": {
                    "validateConfig": ["validate-config"],
                    "bindRoutes": ["bind-routes"],
                },
            }),
            hooks.clone(),
        );
        register(&ctx).unwrap();

        let subscribed = hooks.subscribed.lock().unwrap().clone();
        assert_eq!(subscribed, ["validate-config", "bind-routes"]);
    }

    #[test]
    fn lookup_table() {
        assert!(lookup("bindRoutes").is_some());
        assert!(lookup("validateConfig").is_some());
        assert!(lookup("login").is_none());
    }

    #[test]
    fn validate_config_hook_checks_context() {
        let ctx = Context::new(json!({}));
        let err = validate_config_hook(&mut HookPayload::ValidateConfig { context: &ctx })
            .unwrap_err();
        assert!(matches!(err, Error::MissingConfigKey));
    }

    #[test]
    fn bind_routes_hook_without_server_is_a_no_op() {
        let ctx = Context::default();
        assert!(bind_routes_hook(&mut HookPayload::ValidateConfig { context: &ctx }).is_ok());
    }
}
