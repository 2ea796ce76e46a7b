//! Calendar provider HTTP clients
//!
//! One client per provider, each implementing the core `CalendarClient` port
//! against the provider's REST API.

pub mod google;
pub mod microsoft;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use goca_core::CalendarEventRequest;
use goca_domain::{GocaError, ProviderKind, ProviderSettings, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

pub use google::GoogleCalendarClient;
pub use microsoft::MicrosoftCalendarClient;

/// Wall-clock layout both providers accept next to an explicit time zone.
const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Validated API base URL without a trailing slash.
pub(crate) fn base_url(settings: &ProviderSettings) -> Result<String> {
    let parsed = Url::parse(settings.api_base_url.trim()).map_err(|err| {
        GocaError::Config(format!("invalid api_base_url {:?}: {err}", settings.api_base_url))
    })?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

pub(crate) fn format_local(value: NaiveDateTime) -> String {
    value.format(LOCAL_DATETIME_FORMAT).to_string()
}

/// Instant of a wall-clock value in the IANA zone `timezone`.
///
/// A time skipped by a DST gap has no instant and yields `None`; an ambiguous
/// one resolves to the earlier instant.
pub(crate) fn to_utc(local: NaiveDateTime, timezone: &str) -> Option<DateTime<Utc>> {
    let zone: Tz = timezone.trim().parse().ok()?;
    zone.from_local_datetime(&local).earliest().map(|instant| instant.with_timezone(&Utc))
}

/// Requested event window as UTC instants.
///
/// Falls back to reading the wall-clock values as UTC when the zone is not a
/// known IANA name.
pub(crate) fn requested_window(event: &CalendarEventRequest) -> (DateTime<Utc>, DateTime<Utc>) {
    match (to_utc(event.start, &event.timezone), to_utc(event.end, &event.timezone)) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            warn!(timezone = %event.timezone, "unresolvable event time zone; treating window as UTC");
            (event.start.and_utc(), event.end.and_utc())
        }
    }
}

/// Window of an event the provider already created.
///
/// The event exists remotely once the provider accepted it, so an echo that
/// cannot be read never fails the call; the requested window is used instead.
pub(crate) fn created_window(
    provider: ProviderKind,
    event_id: &str,
    echoed: Result<(DateTime<Utc>, DateTime<Utc>)>,
    event: &CalendarEventRequest,
) -> (DateTime<Utc>, DateTime<Utc>) {
    echoed.unwrap_or_else(|err| {
        warn!(
            %provider,
            event_id,
            error = %err,
            "created event window unreadable; using requested window"
        );
        requested_window(event)
    })
}

/// Decode a successful JSON response or turn the failure into a domain error.
///
/// 401 is a credential problem; every other non-success status is a provider
/// error carrying the response body verbatim.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: ProviderKind,
    response: Response,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(|err| {
        GocaError::Network(format!("failed to read {provider} response body: {err}"))
    })?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(GocaError::Credential(format!(
            "{provider} rejected the access token: {}",
            non_empty(&body, status)
        )));
    }

    if !status.is_success() {
        return Err(GocaError::ProviderApi(non_empty(&body, status)));
    }

    serde_json::from_str(&body)
        .map_err(|err| GocaError::ProviderApi(format!("unexpected {provider} response: {err}")))
}

fn non_empty(body: &str, status: StatusCode) -> String {
    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn base_url_is_validated_and_trimmed() {
        let settings = ProviderSettings::google().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(base_url(&settings).unwrap(), "http://127.0.0.1:9000");

        let settings = ProviderSettings::google().with_base_url("not a url");
        assert!(matches!(base_url(&settings), Err(GocaError::Config(_))));
    }

    #[test]
    fn local_time_converts_through_iana_zone() {
        let local = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(
            to_utc(local, "Europe/Berlin").unwrap().to_rfc3339(),
            "2024-05-01T08:00:00+00:00"
        );
        assert_eq!(to_utc(local, "UTC").unwrap().to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert!(to_utc(local, "Pacific Standard Time").is_none());
    }

    #[test]
    fn dst_gap_has_no_instant() {
        let skipped = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap().and_hms_opt(2, 30, 0).unwrap();
        assert!(to_utc(skipped, "Europe/Berlin").is_none());
    }

    #[test]
    fn local_datetime_has_no_offset() {
        let value = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(format_local(value), "2024-05-01T10:00:00");
    }
}
