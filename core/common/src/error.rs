//! Common error types for ShutterDrop.

use thiserror::Error;

/// Top-level error type for ShutterDrop operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication with the identity provider failed or is missing.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network or remote API failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Access to a remote resource was denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
