//! Error types for MedRoute

/// Result type alias using MedRoute's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for MedRoute operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before any backend was invoked
    #[error("invalid input: {0}")]
    Validation(String),

    /// Backend call failures (network, non-success status, model runtime)
    #[error("backend error: {0}")]
    Backend(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("backend request timed out")]
    Timeout,
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
