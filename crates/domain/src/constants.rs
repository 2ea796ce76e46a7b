//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Booking form limits
pub const MAX_VISITOR_NAME_LENGTH: usize = 120;
pub const MAX_NOTES_LENGTH: usize = 2000;

// Meeting text
pub const SUMMARY_JOINER: &str = "between";
pub const DESCRIPTION_NOTES_LABEL: &str = "Notes:";

// Configuration defaults
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "goca.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com";
pub const MICROSOFT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";
