use std::future::Future;
use std::pin::Pin;

use super::types::LoginRequest;
use crate::types::Profile;

/// Error type returned by consumer-provided capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a credential check: `Some(profile)` on success, `None` on rejection.
pub type LoginResult = Result<Option<Profile>, BoxError>;

/// Consumer-provided credential check.
///
/// Called once per login request. Return `Ok(None)` for bad credentials and
/// `Err` only for failures that should reach the host error path.
///
/// # Example
///
/// ```rust,ignore
/// impl LoginValidator for Accounts {
///     async fn validate(&self, request: &LoginRequest) -> LoginResult {
///         let Some(token) = request.field("token") else {
///             return Ok(None);
///         };
///         let user = self.repo.find_by_token(token).await?;
///         Ok(user.map(|u| json!({ "id": u.id, "admin": u.admin }).into()))
///     }
/// }
/// ```
pub trait LoginValidator: Send + Sync + 'static {
    fn validate(&self, request: &LoginRequest) -> impl Future<Output = LoginResult> + Send;
}

/// Synchronous [`LoginValidator`] built from a closure. See [`validate_fn`].
#[derive(Clone)]
pub struct ValidateFn<F>(F);

/// Wrap a synchronous closure as a [`LoginValidator`].
pub fn validate_fn<F>(f: F) -> ValidateFn<F>
where
    F: Fn(&LoginRequest) -> LoginResult + Send + Sync + 'static,
{
    ValidateFn(f)
}

impl<F> LoginValidator for ValidateFn<F>
where
    F: Fn(&LoginRequest) -> LoginResult + Send + Sync + 'static,
{
    fn validate(&self, request: &LoginRequest) -> impl Future<Output = LoginResult> + Send {
        std::future::ready((self.0)(request))
    }
}

/// Host-owned per-client session.
///
/// The plugin never creates sessions. It writes the profile after a successful
/// login and ends the session on logout.
pub trait Session: Send + Sync + 'static {
    /// Store `profile` under the session's `profile` field.
    fn set_profile(&self, profile: &Profile) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// End the session.
    fn destroy(&self) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe wrapper for LoginValidator (needed for Arc<dyn>).
pub(crate) trait LoginValidatorDyn: Send + Sync {
    fn validate_dyn<'a>(
        &'a self,
        request: &'a LoginRequest,
    ) -> Pin<Box<dyn Future<Output = LoginResult> + Send + 'a>>;
}

impl<T: LoginValidator> LoginValidatorDyn for T {
    fn validate_dyn<'a>(
        &'a self,
        request: &'a LoginRequest,
    ) -> Pin<Box<dyn Future<Output = LoginResult> + Send + 'a>> {
        Box::pin(self.validate(request))
    }
}

/// Object-safe wrapper for Session.
pub(crate) trait SessionDyn: Send + Sync {
    fn set_profile_dyn<'a>(
        &'a self,
        profile: &'a Profile,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

    fn destroy_dyn(&self) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + '_>>;
}

impl<T: Session> SessionDyn for T {
    fn set_profile_dyn<'a>(
        &'a self,
        profile: &'a Profile,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.set_profile(profile))
    }

    fn destroy_dyn(&self) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + '_>> {
        Box::pin(self.destroy())
    }
}
