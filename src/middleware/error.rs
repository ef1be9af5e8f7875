use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::traits::BoxError;

/// Per-request failures raised by the login/logout chain.
///
/// Returned from handlers instead of being rendered inline, so they reach the
/// same place as any other handler error in the host.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Request body could not be read or parsed.
    #[error("Bad request body: {0}")]
    Body(String),

    /// The login validator failed.
    #[error("Login validation failed: {0}")]
    Validation(BoxError),

    /// Session missing or session operation failed.
    #[error("Session error: {0}")]
    Session(String),

    /// Plugin settings could not be resolved.
    #[error(transparent)]
    Config(#[from] crate::error::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Body(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            Self::Validation(_) | Self::Session(_) | Self::Config(_) => {
                tracing::error!(error = %self, "Auth internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
