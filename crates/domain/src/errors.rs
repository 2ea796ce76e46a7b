//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Goca
///
/// Every port in `goca-core` returns this type. The booking orchestrator maps
/// it onto an outward error kind depending on the step that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GocaError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Credential error: {0}")]
    Credential(String),

    /// Remote calendar provider rejected or failed the call. The payload is
    /// the provider's message, unmodified.
    #[error("{0}")]
    ProviderApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GocaError {
    /// The message carried by the error, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Credential(msg)
            | Self::ProviderApi(msg)
            | Self::Database(msg)
            | Self::Network(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias for Goca operations
pub type Result<T> = std::result::Result<T, GocaError>;
