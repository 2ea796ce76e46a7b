//! Serialized OAuth token stored in a provider credential

use std::fmt;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens expiring within this window are treated as already expired so a
/// request does not start with a token that dies mid-flight.
pub const EXPIRY_SKEW_SECS: i64 = 10;

/// OAuth 2.0 token as persisted alongside a host's provider connection.
///
/// An `expiry` in year 1 (`0001-01-01T00:00:00Z`) is how some token writers
/// encode "no expiry"; it is treated the same as an absent expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl OAuthToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expiry: None,
        }
    }

    #[must_use]
    pub fn expiring_at(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Effective expiry, ignoring the year-one "unset" sentinel.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry.filter(|expiry| expiry.year() > 1)
    }

    /// True when the token has no access token or expires within
    /// [`EXPIRY_SKEW_SECS`] of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.trim().is_empty() {
            return true;
        }
        self.expires_at()
            .is_some_and(|expiry| expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS))
    }
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("token_type", &self.token_type)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
