use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use axum::routing::post;

use super::error::AuthError;

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AuthError>> + Send>>;

/// One element of a route's request-handler chain.
///
/// A middleware either answers the request or hands it to `next`. The login
/// and logout handlers are middleware too, so a handler can defer to whatever
/// follows it on the route.
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(Request, Next) -> MiddlewareFuture + Send + Sync>);

impl Middleware {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, AuthError>> + Send + 'static,
    {
        Self(Arc::new(move |request: Request, next: Next| -> MiddlewareFuture {
            Box::pin(f(request, next))
        }))
    }

    /// A middleware that always hands the request on.
    #[must_use]
    pub fn passthrough() -> Self {
        Self::new(|request, next: Next| async move {
            Ok::<_, AuthError>(next.run(request).await)
        })
    }

    fn call(&self, request: Request, next: Next) -> MiddlewareFuture {
        (self.0)(request, next)
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Middleware")
    }
}

/// Server capability: register a `POST` route running `chain` in order.
pub trait RouteRegistrar {
    fn post(&mut self, path: &str, chain: Vec<Middleware>);
}

/// Each chain element becomes a `from_fn` route layer, the first one outermost.
/// Only `POST` reaches the chain; other methods get `405 Method Not Allowed`.
/// A request that passes through the whole chain gets `404 Not Found`.
///
/// # Panics
///
/// Like [`Router::route`], panics if the router already has a `POST` route at
/// `path`.
impl RouteRegistrar for Router {
    fn post(&mut self, path: &str, chain: Vec<Middleware>) {
        let mut route = post(unhandled);
        for middleware in chain.into_iter().rev() {
            route = route.route_layer(from_fn(move |request: Request, next: Next| {
                let middleware = middleware.clone();
                async move { middleware.call(request, next).await }
            }));
        }
        *self = std::mem::take(self).route(path, route);
    }
}

async fn unhandled() -> StatusCode {
    StatusCode::NOT_FOUND
}
