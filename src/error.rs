use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlossaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation service error: {0}")]
    Service(String),

    #[error("Translation failed at chunk {chunk}: {message}")]
    Translation { chunk: usize, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A failure settled by another caller of the same in-flight key.
    /// Followers of a single-flight execution receive the leader's error
    /// through a shared handle.
    #[error("{0}")]
    Bundled(Arc<GlossaError>),
}

impl GlossaError {
    /// Collapse the bundled wrapper so callers can match on the original
    /// variant regardless of whether they were leader or follower.
    pub fn unbundle(&self) -> &GlossaError {
        match self {
            GlossaError::Bundled(inner) => inner.unbundle(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GlossaError>;
