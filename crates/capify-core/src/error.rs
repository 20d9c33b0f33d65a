use thiserror::Error;

/// Top-level error type for the capify system.
///
/// Covers startup concerns (configuration, credentials, taxonomy
/// validation). Per-message failures live in the chat crate's own error
/// type, which converts from this one so `?` works across crates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CapifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CapifyError {
    fn from(err: toml::de::Error) -> Self {
        CapifyError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CapifyError {
    fn from(err: serde_json::Error) -> Self {
        CapifyError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for capify operations.
pub type Result<T> = std::result::Result<T, CapifyError>;
