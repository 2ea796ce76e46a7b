//! HTTP routes for the booking service

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{MatchedPath, Path, State};
use axum::http::{HeaderName, HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use goca_core::BookingOutcome;
use goca_domain::{Booking, BookingForm, BookingId, GocaError, HostPage};
use serde_json::{json, Value};
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::utils::logging::{error_label, log_request_completion};
use crate::AppContext;

/// Response header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router.
pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/booking", post(submit_booking))
        .route("/booking/{username}", get(host_page))
        .route("/schedule/{id}", get(get_booking))
        .route("/health", get(health))
        .layer(middleware::from_fn(request_context))
        .with_state(context)
}

async fn host_page(
    State(context): State<Arc<AppContext>>,
    Path(username): Path<String>,
) -> Result<Json<HostPage>, ApiError> {
    let page = context.bookings.host_page(&username).await?;
    Ok(Json(page))
}

async fn submit_booking(
    State(context): State<Arc<AppContext>>,
    payload: Result<Json<BookingForm>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingOutcome>), ApiError> {
    let Json(form) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let outcome = context.bookings.submit(&form).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn get_booking(
    State(context): State<Arc<AppContext>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let id = raw_id
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("invalid booking id: {raw_id}")))?;
    let booking = context.bookings.booking(BookingId(id)).await?;
    Ok(Json(booking))
}

async fn health(State(context): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    let db = Arc::clone(&context.db);
    let outcome = tokio::task::spawn_blocking(move || db.health_check())
        .await
        .map_err(|err| GocaError::Internal(format!("health check task failed: {err}")))?;

    if let Err(err) = outcome {
        error!(error_type = error_label(&err), error = %err, "database health check failed");
        return Err(err.into());
    }
    Ok(Json(json!({ "status": "ok" })))
}

/// Attach a request id span and header, and log completion.
async fn request_context(request: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let span = info_span!("request", request_id = %request_id, %method, path = %path);
    let started = Instant::now();
    let mut response = next.run(request).instrument(span).await;

    log_request_completion(&method, &path, response.status(), started.elapsed());
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
