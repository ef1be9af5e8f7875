#![doc = include_str!("../README.md")]

pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod middleware;
pub mod types;

// Re-exports for convenient access
pub use config::{CONFIG_KEY, EventTable, Settings, validate_config};
pub use context::Context;
pub use error::Error;
pub use hooks::{EventDispatcher, Hook, HookPayload, register};
pub use types::{PROFILE_KEY, Profile};
