use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session field the profile is stored under.
pub const PROFILE_KEY: &str = "profile";

/// Opaque success value from the login validator.
///
/// Stored verbatim in the session and echoed to JSON clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct Profile(pub Value);
