use std::sync::Arc;

use axum::Json;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::chain::{Middleware, RouteRegistrar};
use super::error::AuthError;
use super::traits::LoginValidatorDyn;
use super::types::{LoginRequest, SessionHandle};
use crate::config::Settings;
use crate::context::Context;
use crate::error::Error;

/// Largest login body the handler will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// Register the login and logout routes on `server`.
///
/// `POST loginPath` runs the `loginMiddleware` chain, then [`login`];
/// `POST logoutPath` runs the `logoutMiddleware` chain, then [`logout`].
///
/// # Errors
///
/// - [`Error::Section`] if the plugin section is malformed.
/// - [`Error::UnknownMiddleware`] if a chain names middleware the context lacks.
/// - [`Error::InvalidRoute`] if a path is not a static route axum accepts, or
///   both paths match.
pub fn bind_routes<R>(server: &mut R, context: &Arc<Context>) -> Result<(), Error>
where
    R: RouteRegistrar + ?Sized,
{
    tracing::debug!("bindRoutes");
    let settings = Settings::resolve(context)?;
    tracing::debug!(
        login_path = %settings.login_path,
        logout_path = %settings.logout_path,
        "Binding auth routes"
    );

    check_route(&settings.login_path)?;
    check_route(&settings.logout_path)?;
    if settings.login_path == settings.logout_path {
        return Err(Error::InvalidRoute(format!(
            "login and logout share the path `{}`",
            settings.login_path
        )));
    }

    let login_chain = chain(context, &settings.login_middleware, login(context.clone()))?;
    let logout_chain = chain(context, &settings.logout_middleware, logout(context.clone()))?;

    server.post(&settings.login_path, login_chain);
    server.post(&settings.logout_path, logout_chain);
    Ok(())
}

/// Reject paths `Router::route` would panic on. Auth routes are static, so
/// captures and wildcards are refused too.
fn check_route(path: &str) -> Result<(), Error> {
    if !path.starts_with('/') {
        return Err(Error::InvalidRoute(format!("`{path}` must start with '/'")));
    }
    if path.contains(['{', '}']) {
        return Err(Error::InvalidRoute(format!(
            "`{path}` must not contain captures or braces"
        )));
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(Error::InvalidRoute(format!(
            "`{path}` must not contain `:` or `*` segments"
        )));
    }
    Ok(())
}

fn chain(
    context: &Context,
    names: &[String],
    handler: Middleware,
) -> Result<Vec<Middleware>, Error> {
    let mut chain = names
        .iter()
        .map(|name| {
            context
                .middleware(name)
                .cloned()
                .ok_or_else(|| Error::UnknownMiddleware(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    chain.push(handler);
    Ok(chain)
}

// ── Login ──────────────────────────────────────────────────────────

/// Login handler bound to `context`.
///
/// With no login validator on the context, the request is handed to the next
/// element of the route's chain.
pub fn login(context: Arc<Context>) -> Middleware {
    Middleware::new(move |request, next| {
        let context = context.clone();
        async move { handle_login(&context, request, next).await }
    })
}

async fn handle_login(
    context: &Context,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    tracing::debug!("login");
    let settings = Settings::resolve(context)?;

    let Some(validator) = context.login_validator() else {
        tracing::debug!("Missing login validator, passing request on");
        return Ok(next.run(request).await);
    };

    let (parts, body) = request.into_parts();
    let session = parts.extensions.get::<SessionHandle>().cloned();
    let raw_body = to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|e| AuthError::Body(e.to_string()))?;
    let login_request = LoginRequest::new(parts.headers, raw_body)?;

    let profile = validator
        .validate_dyn(&login_request)
        .await
        .map_err(AuthError::Validation)?;
    tracing::debug!(success = profile.is_some(), "Login validated");

    let Some(profile) = profile else {
        if login_request.is_json() {
            let body = Json(json!({ "error": true }));
            return Ok((StatusCode::UNAUTHORIZED, body).into_response());
        }
        return Ok(found(&settings.login_path));
    };

    session
        .ok_or_else(|| AuthError::Session("no session on login request".into()))?
        .set_profile(&profile)
        .await?;

    if login_request.is_json() {
        Ok((StatusCode::OK, Json(profile)).into_response())
    } else {
        Ok(found(&settings.login_redirect_path))
    }
}

// ── Logout ─────────────────────────────────────────────────────────

/// Logout handler bound to `context`. Always redirects to `logoutRedirectPath`.
pub fn logout(context: Arc<Context>) -> Middleware {
    Middleware::new(move |request, _next| {
        let context = context.clone();
        async move { handle_logout(&context, request).await }
    })
}

async fn handle_logout(context: &Context, request: Request) -> Result<Response, AuthError> {
    tracing::debug!("logout");
    let settings = Settings::resolve(context)?;

    let session = request.extensions().get::<SessionHandle>().cloned();
    match session {
        Some(session) => {
            if let Err(e) = session.destroy().await {
                tracing::warn!(error = %e, "Session destruction failed during logout");
            }
        }
        None => tracing::debug!("No session on logout request"),
    }

    Ok(found(&settings.logout_redirect_path))
}

// ── Helpers ────────────────────────────────────────────────────────

fn found(path: &str) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, path)],
        format!("Found. Redirecting to {path}"),
    )
        .into_response()
}
