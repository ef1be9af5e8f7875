use crate::config::CONFIG_KEY;

/// Setup-time failures: configuration, registration and route binding.
///
/// These are meant to stop the host at startup. Per-request failures use
/// [`AuthError`](crate::middleware::AuthError) instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Config Error: '{}' configuration key is missing.", CONFIG_KEY)]
    MissingConfigKey,
    #[error(
        "Config Error: `loginPath` should be a string server route to where credentials should be POSTed to."
    )]
    LoginPath,
    #[error(
        "Config Error: `loginRedirectPath` should be a string server route to where a successful login should navigate to."
    )]
    LoginRedirectPath,
    #[error(
        "Config Error: `loginMiddleware` should be an array of middleware names or an empty array."
    )]
    LoginMiddleware,
    #[error(
        "Config Error: `logoutPath` should be a string server route to where logout requests should be POSTed to."
    )]
    LogoutPath,
    #[error(
        "Config Error: `logoutRedirectPath` should be a string server route to where a logout should navigate to."
    )]
    LogoutRedirectPath,
    #[error(
        "Config Error: `logoutMiddleware` should be an array of middleware names or an empty array."
    )]
    LogoutMiddleware,
    #[error("Config Error: `validateLogin` should be a login validator set on the context.")]
    ValidateLogin,
    /// A section key is present but cannot be read as its expected type.
    #[error("Config Error: '{}' section is malformed: {}", CONFIG_KEY, .0)]
    Section(#[source] serde_json::Error),
    #[error("Config Error: unknown middleware `{0}`")]
    UnknownMiddleware(String),
    #[error("Config Error: invalid route: {0}")]
    InvalidRoute(String),
    #[error("Config Error: could not load host configuration: {0}")]
    Load(String),
    #[error("Missing event dispatcher in `Context::with_hooks(dispatcher)` format.")]
    MissingDispatcher,
    #[error("Missing events to listen to for in 'config.events'.")]
    MissingEvents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_plugin() {
        assert_eq!(
            Error::MissingConfigKey.to_string(),
            "Config Error: 'uttori-plugin-auth-simple' configuration key is missing."
        );
    }

    #[test]
    fn unknown_middleware_names_the_entry() {
        let err = Error::UnknownMiddleware("csrf".into());
        assert_eq!(err.to_string(), "Config Error: unknown middleware `csrf`");
    }
}
