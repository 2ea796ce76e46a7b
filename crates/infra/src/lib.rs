//! # Goca Infrastructure
//!
//! Infrastructure implementations of the `goca-core` booking ports.
//!
//! This crate contains:
//! - SQLite repositories for hosts, event types and bookings
//! - Google Calendar and Microsoft Graph HTTP clients
//! - OAuth token decoding
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `goca-core`
//! - Contains all I/O; the core never touches the network or disk

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

pub use database::{DbManager, SqliteBookingRepository, SqliteHostRepository};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::calendar::{JsonTokenCodec, ReqwestCalendarClientFactory};
