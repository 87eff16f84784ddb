//! Configuration loading and types.
//!
//! The blog is configured by an INI file (`blog.ini` by default):
//! - Type definitions for the sections (`types`)
//! - Loading and layering from files (`load`)
//!
//! The configuration is read once at startup, validated eagerly, and treated
//! as immutable for the lifetime of the process.

mod load;
mod types;

pub use types::{RoutesSection, Settings};

/// Environment variable naming an optional INI overlay merged over the base
/// config file (used by test and staging deployments).
pub const OVERLAY_ENV_VAR: &str = "QUILL_CONFIG_OVERLAY";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Validation(String),
}
