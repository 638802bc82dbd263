use thiserror::Error;

/// Top-level error type for the Holly system.
///
/// Only infrastructure concerns live here. Conversational misses (unknown
/// intent, missing entity, unknown holiday) are answered with a fallback
/// reply and never surface as errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HollyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid holiday record '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HollyError {
    fn from(err: toml::de::Error) -> Self {
        HollyError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HollyError {
    fn from(err: toml::ser::Error) -> Self {
        HollyError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HollyError {
    fn from(err: serde_json::Error) -> Self {
        HollyError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Holly operations.
pub type Result<T> = std::result::Result<T, HollyError>;
