use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use super::error::AuthError;
use super::traits::{Session, SessionDyn};
use crate::types::Profile;

/// What the login validator sees of a login request.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Request headers, as sent.
    pub headers: HeaderMap,
    /// Body parsed by content type: JSON as-is, URL-encoded forms as an
    /// object of strings, anything else as `null`.
    pub body: Value,
    /// Unparsed body.
    pub raw_body: Bytes,
}

impl LoginRequest {
    /// Build a login request, parsing the body according to `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Body`] if a JSON body does not parse.
    pub fn new(headers: HeaderMap, raw_body: Bytes) -> Result<Self, AuthError> {
        let body = match media_type(&headers).as_deref() {
            Some("application/json") if raw_body.is_empty() => Value::Null,
            Some("application/json") => serde_json::from_slice(&raw_body)
                .map_err(|e| AuthError::Body(format!("invalid JSON: {e}")))?,
            Some("application/x-www-form-urlencoded") => Value::Object(
                url::form_urlencoded::parse(&raw_body)
                    .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                    .collect::<Map<_, _>>(),
            ),
            _ => Value::Null,
        };
        Ok(Self {
            headers,
            body,
            raw_body,
        })
    }

    /// String field of the parsed body.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }

    /// Whether the request was sent as `application/json`.
    #[must_use]
    pub fn is_json(&self) -> bool {
        is_json(&self.headers)
    }
}

/// Lowercased media type of `Content-Type`, without parameters.
fn media_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(';').next())
        .map(|s| s.trim().to_ascii_lowercase())
}

pub(super) fn is_json(headers: &HeaderMap) -> bool {
    media_type(headers).as_deref() == Some("application/json")
}

/// The host session for the current request.
///
/// Host session middleware inserts one into the request extensions, e.g. with
/// `router.layer(axum::Extension(SessionHandle::new(session)))` or per request
/// from its own layer.
#[derive(Clone)]
pub struct SessionHandle(Arc<dyn SessionDyn>);

impl SessionHandle {
    #[must_use]
    pub fn new(session: impl Session) -> Self {
        Self(Arc::new(session))
    }

    pub(super) async fn set_profile(&self, profile: &Profile) -> Result<(), AuthError> {
        self.0
            .set_profile_dyn(profile)
            .await
            .map_err(|e| AuthError::Session(e.to_string()))
    }

    pub(super) async fn destroy(&self) -> Result<(), AuthError> {
        self.0
            .destroy_dyn()
            .await
            .map_err(|e| AuthError::Session(e.to_string()))
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionHandle")
    }
}
