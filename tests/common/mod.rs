//! Stand-ins for the host: event dispatcher, session layer, and request helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use auth_simple::middleware::{BoxError, Session, SessionHandle};
use auth_simple::{Context, Error, EventDispatcher, Hook, HookPayload, PROFILE_KEY, Profile};
use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use axum::{Extension, Router};
use serde_json::Value;

/// Dispatcher that keeps subscriptions and fires them on demand.
#[derive(Default)]
pub struct TestHooks {
    listeners: Mutex<HashMap<String, Vec<Hook>>>,
}

impl EventDispatcher for TestHooks {
    fn on(&self, event: &str, hook: Hook) {
        self.listeners
            .lock()
            .unwrap()
            .entry(event.to_string())
            .or_default()
            .push(hook);
    }
}

impl TestHooks {
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .get(event)
            .map_or(0, Vec::len)
    }

    pub fn fire(&self, event: &str, payload: &mut HookPayload<'_>) -> Result<(), Error> {
        let hooks = self
            .listeners
            .lock()
            .unwrap()
            .get(event)
            .cloned()
            .unwrap_or_default();
        for hook in hooks {
            hook(&mut *payload)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub values: HashMap<String, Value>,
    pub destroyed: bool,
}

/// In-memory session for one client.
#[derive(Clone, Default)]
pub struct MemorySession {
    pub state: Arc<Mutex<SessionState>>,
    pub fail_destroy: bool,
}

impl MemorySession {
    pub fn failing_destroy() -> Self {
        Self {
            fail_destroy: true,
            ..Self::default()
        }
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state
            .lock()
            .unwrap()
            .values
            .get(PROFILE_KEY)
            .cloned()
            .map(Profile)
    }

    pub fn set(&self, key: &str, value: Value) {
        self.state.lock().unwrap().values.insert(key.to_string(), value);
    }

    pub fn destroyed(&self) -> bool {
        self.state.lock().unwrap().destroyed
    }
}

impl Session for MemorySession {
    async fn set_profile(&self, profile: &Profile) -> Result<(), BoxError> {
        self.state
            .lock()
            .unwrap()
            .values
            .insert(PROFILE_KEY.to_string(), profile.0.clone());
        Ok(())
    }

    async fn destroy(&self) -> Result<(), BoxError> {
        if self.fail_destroy {
            return Err("session store unavailable".into());
        }
        let mut state = self.state.lock().unwrap();
        state.values.clear();
        state.destroyed = true;
        Ok(())
    }
}

/// Bind the plugin routes on a fresh router with `session` attached to every request.
pub fn app(context: &Arc<Context>, session: &MemorySession) -> Router {
    let mut router: Router = Router::new();
    auth_simple::middleware::bind_routes(&mut router, context).unwrap();
    router.layer(Extension(SessionHandle::new(session.clone())))
}

pub fn form_post(path: &str, body: &'static str) -> Request {
    form_request("POST", path, body)
}

pub fn form_request(method: &str, path: &str, body: &'static str) -> Request {
    Request::builder()
        .method(method)
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn json_post(path: &str, body: &'static str) -> Request {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
