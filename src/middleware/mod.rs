//! Login and logout routes for Axum hosts.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use auth_simple::{Context, middleware::{SessionHandle, bind_routes, validate_fn}};
//!
//! // 1. Implement LoginValidator (or wrap a closure) and Session for your app
//! let context = Arc::new(
//!     Context::from_env()?.with_login_validator(validate_fn(|req| {
//!         Ok((req.field("token") == Some("abcd")).then(|| json!({ "admin": true }).into()))
//!     })),
//! );
//!
//! // 2. Mount the routes
//! let mut app = axum::Router::new();
//! bind_routes(&mut app, &context)?;
//!
//! // 3. Provide the session from your session layer
//! let app = app.layer(axum::Extension(SessionHandle::new(session)));
//! ```
//!
//! Implement [`Session`] and [`LoginValidator`]; the boxed-future wrappers the
//! crate stores them behind are not part of the public API.
//!
//! ```compile_fail
//! use auth_simple::middleware::{LoginValidatorDyn, SessionDyn};
//! ```

mod chain;
mod error;
mod routes;
mod traits;
mod types;

pub use chain::{Middleware, RouteRegistrar};
pub use error::AuthError;
pub use routes::{bind_routes, login, logout};
pub(crate) use traits::LoginValidatorDyn;
pub use traits::{BoxError, LoginResult, LoginValidator, Session, ValidateFn, validate_fn};
pub use types::{LoginRequest, SessionHandle};
