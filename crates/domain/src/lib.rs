//! # Goca Domain
//!
//! Business domain types and models for Goca bookings.
//!
//! This crate contains:
//! - Host, event-type, credential and booking types
//! - Domain error type and Result definition
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Goca crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
