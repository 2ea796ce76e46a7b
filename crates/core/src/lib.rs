//! # Goca Core
//!
//! Pure booking logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for stores, token decoding and
//!   calendar clients
//! - Event-type resolution, provider selection and meeting text building
//! - Google/Microsoft calendar strategies
//! - The booking orchestrator
//!
//! ## Architecture Principles
//! - Only depends on `goca-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod booking;

// Re-export specific items to avoid ambiguity
pub use booking::error::{ErrorKind, OrchestrationError};
pub use booking::ports::{
    BookingStore, CalendarClient, CalendarClientFactory, CalendarEventRequest, EventTypeStore,
    EventAttendee, ProfileStore, TokenCodec,
};
pub use booking::strategy::{
    CalendarStrategy, GoogleCalendarStrategy, MeetingParams, MicrosoftCalendarStrategy,
};
pub use booking::{BookingOutcome, BookingService};
