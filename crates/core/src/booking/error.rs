//! Outward error of the booking orchestrator

use goca_domain::{impl_domain_str_conversions, GocaError};
use serde::Serialize;
use thiserror::Error;

/// Stable error categories surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    HostNotFound,
    EventTypeNotFound,
    CredentialError,
    ProviderApiError,
    PersistenceError,
    BookingNotFound,
    Internal,
}

impl_domain_str_conversions!(ErrorKind {
    ValidationError => "validation_error",
    HostNotFound => "host_not_found",
    EventTypeNotFound => "event_type_not_found",
    CredentialError => "credential_error",
    ProviderApiError => "provider_api_error",
    PersistenceError => "persistence_error",
    BookingNotFound => "booking_not_found",
    Internal => "internal",
});

impl ErrorKind {
    /// Client-caused failures (bad input or unknown identifiers).
    pub const fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::ValidationError
                | Self::HostNotFound
                | Self::EventTypeNotFound
                | Self::BookingNotFound
        )
    }
}

/// Terminal failure of a booking operation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct OrchestrationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl OrchestrationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Map a failure of the calendar strategy. Provider messages pass through
    /// unchanged.
    pub fn from_remote(err: GocaError) -> Self {
        match err {
            GocaError::Credential(message) => Self::new(ErrorKind::CredentialError, message),
            GocaError::ProviderApi(message) => Self::new(ErrorKind::ProviderApiError, message),
            other => Self::new(ErrorKind::ProviderApiError, other.to_string()),
        }
    }

    /// Map a failure of a collaborator store that has no dedicated kind.
    pub fn internal(err: &GocaError) -> Self {
        Self::new(ErrorKind::Internal, err.to_string())
    }
}

impl From<GocaError> for OrchestrationError {
    fn from(err: GocaError) -> Self {
        match err {
            GocaError::Validation(message) => Self::new(ErrorKind::ValidationError, message),
            GocaError::Credential(_) | GocaError::ProviderApi(_) => Self::from_remote(err),
            other => Self::internal(&other),
        }
    }
}
