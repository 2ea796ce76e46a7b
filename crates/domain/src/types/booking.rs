//! Booking types: inbound form, validated request, meeting descriptor and
//! persisted records

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::host::ProviderKind;
use crate::constants::{MAX_NOTES_LENGTH, MAX_VISITOR_NAME_LENGTH};
use crate::errors::{GocaError, Result};
use crate::impl_domain_str_conversions;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Where the visitor wants the meeting to take place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingLocation {
    Google,
    Microsoft,
    #[default]
    Unspecified,
}

impl_domain_str_conversions!(MeetingLocation {
    Google => "google",
    Microsoft => "microsoft",
    Unspecified => "unspecified",
});

impl MeetingLocation {
    /// Provider whose calendar should host the meeting, if any.
    pub const fn provider(self) -> Option<ProviderKind> {
        match self {
            Self::Google => Some(ProviderKind::Google),
            Self::Microsoft => Some(ProviderKind::Microsoft),
            Self::Unspecified => None,
        }
    }
}

/// Raw booking form as submitted by a visitor.
///
/// Every field is optional on the wire; [`BookingForm::validate`] reports all
/// missing or malformed fields at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub username: String,
    pub name: String,
    pub email: String,
    pub event_type_id: i64,
    pub date: String,
    pub time: String,
    #[serde(alias = "location")]
    pub meeting_location: Option<String>,
    pub notes: String,
}

impl BookingForm {
    /// Check well-formedness and produce the immutable [`BookingRequest`].
    ///
    /// # Errors
    /// Returns `GocaError::Validation` listing every failing field.
    pub fn validate(&self) -> Result<BookingRequest> {
        let mut problems = Vec::new();

        let username = required(&self.username, "username", &mut problems);
        let name = required(&self.name, "name", &mut problems);
        if name.chars().count() > MAX_VISITOR_NAME_LENGTH {
            problems.push(format!("name must be at most {MAX_VISITOR_NAME_LENGTH} characters"));
        }

        let email = required(&self.email, "email", &mut problems);
        if !email.is_empty() && !is_plausible_email(email) {
            problems.push("email is not a valid address".to_string());
        }

        if self.event_type_id <= 0 {
            problems.push("event_type_id must be a positive integer".to_string());
        }

        let date = match required(&self.date, "date", &mut problems) {
            "" => None,
            raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| problems.push(format!("date must be YYYY-MM-DD, got {raw:?}")))
                .ok(),
        };

        let time = match required(&self.time, "time", &mut problems) {
            "" => None,
            raw => {
                let parsed = TIME_FORMATS
                    .iter()
                    .find_map(|format| NaiveTime::parse_from_str(raw, format).ok());
                if parsed.is_none() {
                    problems.push(format!("time must be HH:MM, got {raw:?}"));
                }
                parsed
            }
        };

        let location = match self.meeting_location.as_deref().map(str::trim) {
            None | Some("") => MeetingLocation::Unspecified,
            Some(raw) => raw.parse::<MeetingLocation>().unwrap_or_else(|_| {
                problems.push(format!(
                    "meeting_location must be google or microsoft, got {raw:?}"
                ));
                MeetingLocation::Unspecified
            }),
        };

        if self.notes.chars().count() > MAX_NOTES_LENGTH {
            problems.push(format!("notes must be at most {MAX_NOTES_LENGTH} characters"));
        }

        match (date, time) {
            (Some(date), Some(time)) if problems.is_empty() => Ok(BookingRequest {
                username: username.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                event_type_id: self.event_type_id,
                date,
                time,
                location,
                notes: self.notes.clone(),
            }),
            _ => Err(GocaError::Validation(problems.join("; "))),
        }
    }
}

fn required<'a>(value: &'a str, field: &str, problems: &mut Vec<String>) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        problems.push(format!("{field} is required"));
    }
    trimmed
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    }
}

/// Validated booking request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub event_type_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: MeetingLocation,
    pub notes: String,
}

/// Provider-neutral summary of a created remote calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDescriptor {
    pub provider: ProviderKind,
    pub event_id: String,
    pub join_url: Option<String>,
    pub html_link: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Identifier assigned by the booking store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub i64);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Booking handed to the booking store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub host_id: i64,
    pub summary: String,
    pub request: BookingRequest,
    pub meeting: Option<MeetingDescriptor>,
}

/// Persisted booking as read back from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    #[serde(flatten)]
    pub record: BookingRecord,
    pub created_at: DateTime<Utc>,
}
