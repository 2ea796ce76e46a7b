//! Booking orchestrator - core business logic
//!
//! `create_booking` runs a single pass through [`BookingStep`]s and stops at
//! the first failure:
//!
//! 1. resolve the host profile
//! 2. resolve the requested event type in the host's catalog
//! 3. select a calendar provider from the visitor's requested location
//! 4. build the meeting summary and description
//! 5. create the remote calendar event (only when a provider was selected)
//! 6. persist the booking record
//!
//! No step is retried. A calendar event created in step 5 is not rolled back
//! if step 6 fails or the caller goes away before it completes; the failure
//! is logged with the full meeting descriptor for manual reconciliation.

use std::collections::HashMap;
use std::sync::Arc;

use goca_domain::{
    impl_domain_str_conversions, Booking, BookingForm, BookingId, BookingRecord, BookingRequest,
    GocaError, HostPage, HostProfile, MeetingDescriptor, ProviderKind,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::error::{ErrorKind, OrchestrationError};
use super::meeting;
use super::ports::{BookingStore, EventTypeStore, ProfileStore};
use super::resolver;
use super::selector;
use super::strategy::{CalendarStrategy, MeetingParams};

/// Steps of a booking orchestration, used as a structured log field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    ResolveHost,
    ResolveEventType,
    SelectProvider,
    BuildMeeting,
    CreateRemoteEvent,
    PersistBooking,
}

impl_domain_str_conversions!(BookingStep {
    ResolveHost => "resolve_host",
    ResolveEventType => "resolve_event_type",
    SelectProvider => "select_provider",
    BuildMeeting => "build_meeting",
    CreateRemoteEvent => "create_remote_event",
    PersistBooking => "persist_booking",
});

/// Successful booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingOutcome {
    #[serde(rename = "id")]
    pub booking_id: BookingId,
    pub meeting: Option<MeetingDescriptor>,
}

/// Booking service
pub struct BookingService {
    profiles: Arc<dyn ProfileStore>,
    event_types: Arc<dyn EventTypeStore>,
    bookings: Arc<dyn BookingStore>,
    strategies: HashMap<ProviderKind, Arc<dyn CalendarStrategy>>,
}

impl BookingService {
    /// Create a booking service with no calendar strategies registered.
    ///
    /// Without strategies every booking is stored without a calendar event.
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        event_types: Arc<dyn EventTypeStore>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self { profiles, event_types, bookings, strategies: HashMap::new() }
    }

    /// Register the strategy for its provider, replacing any previous one.
    pub fn with_strategy(mut self, strategy: Arc<dyn CalendarStrategy>) -> Self {
        self.strategies.insert(strategy.provider(), strategy);
        self
    }

    /// Providers that have a registered strategy.
    pub fn providers(&self) -> Vec<ProviderKind> {
        let mut providers: Vec<_> = self.strategies.keys().copied().collect();
        providers.sort_by_key(|kind| kind.as_str());
        providers
    }

    /// Validate a raw booking form, then run [`BookingService::create_booking`].
    pub async fn submit(&self, form: &BookingForm) -> Result<BookingOutcome, OrchestrationError> {
        let request = form.validate().map_err(|err| {
            debug!(error = %err, "booking form rejected");
            OrchestrationError::new(ErrorKind::ValidationError, err.message())
        })?;

        self.create_booking(&request.username, &request).await
    }

    /// Create a booking for `host_username` from a validated request.
    pub async fn create_booking(
        &self,
        host_username: &str,
        request: &BookingRequest,
    ) -> Result<BookingOutcome, OrchestrationError> {
        let host = self.resolve_host(host_username).await?;

        let catalog = self.event_types.list_for_host(host.id).await.map_err(|err| {
            fail(BookingStep::ResolveEventType, host_username, OrchestrationError::internal(&err))
        })?;
        let event_type = resolver::resolve(&catalog, request.event_type_id).ok_or_else(|| {
            fail(
                BookingStep::ResolveEventType,
                host_username,
                OrchestrationError::new(
                    ErrorKind::EventTypeNotFound,
                    format!(
                        "event type {} is not offered by {host_username}",
                        request.event_type_id
                    ),
                ),
            )
        })?;

        let selected = selector::select(&host, request.location).and_then(|credential| {
            match self.strategies.get(&credential.provider) {
                Some(strategy) => Some((credential, Arc::clone(strategy))),
                None => {
                    warn!(
                        host = host_username,
                        provider = %credential.provider,
                        "no strategy registered for provider; booking without calendar event"
                    );
                    None
                }
            }
        });
        debug!(
            host = host_username,
            step = %BookingStep::SelectProvider,
            requested = %request.location,
            provider = selected.as_ref().map(|(credential, _)| credential.provider.as_str()),
            "provider selected"
        );

        let text = meeting::build(&event_type.title, &host.username, &request.name, &request.notes);

        let meeting = match selected {
            Some((credential, strategy)) => {
                let params = MeetingParams {
                    summary: text.summary.clone(),
                    description: text.description,
                    timezone: event_type.timezone.clone(),
                    visitor_name: request.name.clone(),
                    visitor_email: request.email.clone(),
                    date: request.date,
                    time: request.time,
                    duration_minutes: event_type.duration_minutes,
                };
                let descriptor =
                    strategy.create_event(&credential.token, &params).await.map_err(|err| {
                        fail(
                            BookingStep::CreateRemoteEvent,
                            host_username,
                            OrchestrationError::from_remote(err),
                        )
                    })?;
                Some(descriptor)
            }
            None => None,
        };

        let record = BookingRecord {
            host_id: host.id,
            summary: text.summary,
            request: request.clone(),
            meeting: meeting.clone(),
        };

        let booking_id = match self.bookings.create(record).await {
            Ok(id) => id,
            Err(err) => return Err(persistence_failure(host_username, meeting.as_ref(), &err)),
        };

        info!(
            host = host_username,
            booking_id = %booking_id,
            event_type_id = event_type.id,
            provider = meeting.as_ref().map(|m| m.provider.as_str()),
            "booking created"
        );

        Ok(BookingOutcome { booking_id, meeting })
    }

    /// Host profile and event-type catalog for the public booking page.
    pub async fn host_page(&self, username: &str) -> Result<HostPage, OrchestrationError> {
        let host = self.resolve_host(username).await?;
        let event_types = self
            .event_types
            .list_for_host(host.id)
            .await
            .map_err(|err| OrchestrationError::internal(&err))?;
        Ok(HostPage::new(&host, event_types))
    }

    /// Fetch a persisted booking.
    pub async fn booking(&self, id: BookingId) -> Result<Booking, OrchestrationError> {
        self.bookings
            .get(id)
            .await
            .map_err(|err| OrchestrationError::internal(&err))?
            .ok_or_else(|| {
                OrchestrationError::new(ErrorKind::BookingNotFound, format!("booking {id} not found"))
            })
    }

    async fn resolve_host(&self, username: &str) -> Result<HostProfile, OrchestrationError> {
        let not_found = || {
            OrchestrationError::new(ErrorKind::HostNotFound, format!("host {username:?} not found"))
        };

        match self.profiles.get_by_username(username).await {
            Ok(Some(host)) => Ok(host),
            Ok(None) | Err(GocaError::NotFound(_)) => {
                Err(fail(BookingStep::ResolveHost, username, not_found()))
            }
            Err(err) => {
                Err(fail(BookingStep::ResolveHost, username, OrchestrationError::internal(&err)))
            }
        }
    }
}

fn fail(step: BookingStep, host: &str, err: OrchestrationError) -> OrchestrationError {
    if err.kind.is_client_error() {
        debug!(host, step = %step, kind = %err.kind, message = %err.message, "booking rejected");
    } else {
        warn!(host, step = %step, kind = %err.kind, message = %err.message, "booking failed");
    }
    err
}

fn persistence_failure(
    host: &str,
    meeting: Option<&MeetingDescriptor>,
    err: &GocaError,
) -> OrchestrationError {
    match meeting {
        Some(meeting) => error!(
            host,
            step = %BookingStep::PersistBooking,
            provider = %meeting.provider,
            event_id = %meeting.event_id,
            join_url = ?meeting.join_url,
            html_link = ?meeting.html_link,
            start = %meeting.start,
            end = %meeting.end,
            error = %err,
            "booking not persisted but remote calendar event exists; manual reconciliation required"
        ),
        None => error!(
            host,
            step = %BookingStep::PersistBooking,
            error = %err,
            "booking not persisted"
        ),
    }
    OrchestrationError::new(ErrorKind::PersistenceError, err.message())
}
