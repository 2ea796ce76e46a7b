//! Booking creation: resolve the event type, pick a calendar provider, create
//! the remote event and persist the booking.

pub mod error;
pub mod meeting;
pub mod ports;
pub mod resolver;
pub mod selector;
pub mod service;
pub mod strategy;

pub use service::{BookingOutcome, BookingService, BookingStep};
