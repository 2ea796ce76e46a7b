use std::time::Duration;

use axum::http::{Method, StatusCode};
use goca_domain::GocaError;
use tracing::{info, warn};

/// Log the outcome of an HTTP request with structured fields.
///
/// `path` is the matched route template (e.g. `/booking/{username}`) when
/// available so usernames and ids stay out of aggregate log keys.
#[inline]
pub fn log_request_completion(method: &Method, path: &str, status: StatusCode, elapsed: Duration) {
    let duration_ms = elapsed.as_millis() as u64;
    let status = status.as_u16();

    if status < 400 {
        info!(%method, path, status, duration_ms, "request_completed");
    } else {
        warn!(%method, path, status, duration_ms, "request_failed");
    }
}

/// Convert a `GocaError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &GocaError) -> &'static str {
    match error {
        GocaError::Validation(_) => "validation",
        GocaError::NotFound(_) => "not_found",
        GocaError::Credential(_) => "credential",
        GocaError::ProviderApi(_) => "provider_api",
        GocaError::Database(_) => "database",
        GocaError::Network(_) => "network",
        GocaError::Config(_) => "config",
        GocaError::Internal(_) => "internal",
    }
}
