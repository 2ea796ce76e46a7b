//! Calendar integration
//!
//! Token decoding and Google Calendar / Microsoft Graph clients behind the
//! core calendar ports.

pub mod codec;
pub mod factory;
pub mod providers;

pub use codec::JsonTokenCodec;
pub use factory::ReqwestCalendarClientFactory;
pub use providers::{GoogleCalendarClient, MicrosoftCalendarClient};
