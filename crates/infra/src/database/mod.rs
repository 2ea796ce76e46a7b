//! SQLite persistence

pub mod booking_repository;
pub mod host_repository;
pub mod manager;

pub use booking_repository::SqliteBookingRepository;
pub use host_repository::SqliteHostRepository;
pub use manager::{DbConnection, DbManager};
