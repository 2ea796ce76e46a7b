//! Port interfaces for booking creation
//!
//! These traits define the boundaries between the booking orchestrator and
//! the stores, token codec and calendar API clients that live in
//! infrastructure crates.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use goca_domain::{
    Booking, BookingId, BookingRecord, EventType, GocaError, HostProfile, MeetingDescriptor,
    OAuthToken, ProviderKind, ProviderSettings, Result,
};

/// Host profile lookup
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get a host profile (with its provider credentials) by username
    async fn get_by_username(&self, username: &str) -> Result<Option<HostProfile>>;
}

/// Event-type catalog lookup
#[async_trait]
pub trait EventTypeStore: Send + Sync {
    /// List a host's event types in host-defined order
    async fn list_for_host(&self, host_id: i64) -> Result<Vec<EventType>>;
}

/// Booking persistence
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persist a booking record and return its identifier
    async fn create(&self, record: BookingRecord) -> Result<BookingId>;

    /// Fetch a persisted booking
    async fn get(&self, id: BookingId) -> Result<Option<Booking>>;
}

/// Decodes the opaque token string stored in a provider credential
pub trait TokenCodec: Send + Sync {
    fn decode(&self, raw: &str) -> Result<OAuthToken>;
}

/// Builds an authenticated calendar client for one provider
pub trait CalendarClientFactory: Send + Sync {
    fn for_provider(
        &self,
        provider: ProviderKind,
        token: &OAuthToken,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn CalendarClient>>;
}

/// Attendee on a remote calendar event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAttendee {
    pub name: Option<String>,
    pub email: String,
}

/// Provider-neutral payload for creating a remote calendar event.
///
/// `start`/`end` are wall-clock values in `timezone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventRequest {
    pub summary: String,
    pub description: String,
    pub timezone: String,
    pub organizer_email: String,
    pub attendees: Vec<EventAttendee>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Ask the provider to attach a video conference when it can.
    pub request_conference: bool,
}

/// Authenticated client for one provider account
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Email address of the account the token belongs to
    async fn identity_email(&self) -> Result<String>;

    /// Create the remote event
    async fn create_event(&self, event: &CalendarEventRequest) -> Result<MeetingDescriptor>;

    /// Whether [`CalendarClient::create_online_meeting`] is available
    fn supports_online_meetings(&self) -> bool {
        false
    }

    /// Create a standalone online meeting and return its join URL
    async fn create_online_meeting(&self, _event: &CalendarEventRequest) -> Result<String> {
        Err(GocaError::ProviderApi("online meetings are not supported by this provider".into()))
    }
}
