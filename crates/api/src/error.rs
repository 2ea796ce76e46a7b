//! HTTP mapping of orchestration errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use goca_core::{ErrorKind, OrchestrationError};
use goca_domain::GocaError;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every route handler.
///
/// Rendered as `{"error": {"kind": ..., "message": ...}}`.
#[derive(Debug)]
pub struct ApiError(pub OrchestrationError);

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(OrchestrationError::new(ErrorKind::ValidationError, message))
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind)
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::HostNotFound | ErrorKind::EventTypeNotFound | ErrorKind::BookingNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorKind::CredentialError => StatusCode::CONFLICT,
        ErrorKind::ProviderApiError => StatusCode::BAD_GATEWAY,
        ErrorKind::PersistenceError | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<OrchestrationError> for ApiError {
    fn from(err: OrchestrationError) -> Self {
        Self(err)
    }
}

impl From<GocaError> for ApiError {
    fn from(err: GocaError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = %self.0.kind, message = %self.0.message, "request failed");
        } else {
            warn!(kind = %self.0.kind, message = %self.0.message, "request rejected");
        }

        let body = json!({
            "error": {
                "kind": self.0.kind,
                "message": self.0.message,
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(status_for(ErrorKind::ValidationError), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::HostNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::EventTypeNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::BookingNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::CredentialError), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::ProviderApiError), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::PersistenceError), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_convert_through_orchestration_kinds() {
        let err = ApiError::from(GocaError::Validation("bad".into()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(GocaError::Database("locked".into()));
        assert_eq!(err.0.kind, ErrorKind::Internal);
    }
}
