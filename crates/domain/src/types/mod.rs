//! Domain types and models
//!
//! Hosts own event types and provider credentials; visitors submit booking
//! forms that become booking records.

pub mod booking;
pub mod host;
pub mod token;

pub use booking::{
    Booking, BookingForm, BookingId, BookingRecord, BookingRequest, MeetingDescriptor,
    MeetingLocation,
};
pub use host::{EventType, HostPage, HostProfile, ProviderCredential, ProviderKind};
pub use token::OAuthToken;
