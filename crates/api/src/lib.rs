//! # Goca API
//!
//! HTTP application layer - routes, error mapping and entry point.
//!
//! This crate contains:
//! - axum routes (booking page, booking submission, booking lookup, health)
//! - Application context (dependency injection)
//! - Main entry point and setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod error;
pub mod routes;
pub mod utils;

pub use context::AppContext;
pub use error::ApiError;
pub use routes::router;
