//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("config file serialization error")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown config key `{0}` (expected one of: {keys})", keys = super::KEYS.join(", "))]
    UnknownKey(String),

    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("expected `key=value`, got `{0}`")]
    Assignment(String),

    #[error("cannot locate the home directory for `{0}`")]
    Home(String),
}
