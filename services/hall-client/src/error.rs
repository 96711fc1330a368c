//! Error types for the hall client

/// Errors that can occur while talking to the Hall gateway
#[derive(Debug, thiserror::Error)]
pub enum HallError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a readable response
    #[error("Network error: {0}")]
    Network(String),

    /// The response was not the document we expected
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type alias for hall client operations
pub type Result<T> = std::result::Result<T, HallError>;
