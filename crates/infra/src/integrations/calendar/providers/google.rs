//! Google Calendar client

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use goca_core::{CalendarClient, CalendarEventRequest};
use goca_domain::{GocaError, MeetingDescriptor, OAuthToken, ProviderKind, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{created_window, format_local, read_json};
use crate::http::HttpClient;

const USERINFO_PATH: &str = "/oauth2/v2/userinfo";
const EVENTS_PATH: &str = "/calendar/v3/calendars/primary/events";
const MEET_SOLUTION: &str = "hangoutsMeet";

/// Google Calendar client bound to one host's access token
pub struct GoogleCalendarClient {
    http: HttpClient,
    base_url: String,
    token: OAuthToken,
    timeout: Duration,
}

impl GoogleCalendarClient {
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        token: OAuthToken,
        timeout: Duration,
    ) -> Self {
        Self { http, base_url: base_url.into(), token, timeout }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token.access_token)
            .timeout(self.timeout)
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn identity_email(&self) -> Result<String> {
        let response = self.http.send(self.request(Method::GET, USERINFO_PATH)).await?;
        let info: GoogleUserInfo = read_json(ProviderKind::Google, response).await?;

        info.email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| GocaError::Credential("google account has no email address".into()))
    }

    async fn create_event(&self, event: &CalendarEventRequest) -> Result<MeetingDescriptor> {
        let body = GoogleEventBody::from_request(event);
        let builder = self
            .request(Method::POST, EVENTS_PATH)
            .query(&[("conferenceDataVersion", "1"), ("sendUpdates", "all")])
            .json(&body);

        let response = self.http.send(builder).await?;
        let created: GoogleEvent = read_json(ProviderKind::Google, response).await?;
        debug!(event_id = %created.id, "google event created");

        Ok(created.into_descriptor(event))
    }
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventBody {
    summary: String,
    description: String,
    start: GoogleDateTime,
    end: GoogleDateTime,
    attendees: Vec<GoogleAttendee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conference_data: Option<ConferenceData>,
}

impl GoogleEventBody {
    fn from_request(event: &CalendarEventRequest) -> Self {
        let conference_data = event.request_conference.then(|| ConferenceData {
            create_request: CreateConferenceRequest {
                request_id: Uuid::new_v4().to_string(),
                conference_solution_key: ConferenceSolutionKey { kind: MEET_SOLUTION.into() },
            },
        });

        Self {
            summary: event.summary.clone(),
            description: event.description.clone(),
            start: GoogleDateTime {
                date_time: format_local(event.start),
                time_zone: Some(event.timezone.clone()),
            },
            end: GoogleDateTime {
                date_time: format_local(event.end),
                time_zone: Some(event.timezone.clone()),
            },
            attendees: event
                .attendees
                .iter()
                .map(|a| GoogleAttendee { email: a.email.clone(), display_name: a.name.clone() })
                .collect(),
            conference_data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleDateTime {
    /// Empty for all-day echoes, which carry `date` instead.
    #[serde(default)]
    date_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleAttendee {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceData {
    create_request: CreateConferenceRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateConferenceRequest {
    request_id: String,
    conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Serialize)]
struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    id: String,
    html_link: Option<String>,
    hangout_link: Option<String>,
    conference_data: Option<GoogleConference>,
    start: Option<GoogleDateTime>,
    end: Option<GoogleDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleConference {
    #[serde(default)]
    entry_points: Vec<GoogleEntryPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEntryPoint {
    entry_point_type: String,
    uri: String,
}

impl GoogleEvent {
    fn into_descriptor(self, requested: &CalendarEventRequest) -> MeetingDescriptor {
        let echoed = parse_instant(self.start.as_ref())
            .and_then(|start| parse_instant(self.end.as_ref()).map(|end| (start, end)));
        let (start, end) = created_window(ProviderKind::Google, &self.id, echoed, requested);

        let join_url = self.hangout_link.or_else(|| {
            self.conference_data.and_then(|conference| {
                conference
                    .entry_points
                    .into_iter()
                    .find(|entry| entry.entry_point_type == "video")
                    .map(|entry| entry.uri)
            })
        });

        MeetingDescriptor {
            provider: ProviderKind::Google,
            start,
            end,
            event_id: self.id,
            join_url,
            html_link: self.html_link,
        }
    }
}

/// Google echoes `dateTime` as RFC 3339 with the offset of the event zone.
fn parse_instant(value: Option<&GoogleDateTime>) -> Result<DateTime<Utc>> {
    let value = value
        .ok_or_else(|| GocaError::ProviderApi("google event has no start/end dateTime".into()))?;
    DateTime::parse_from_rfc3339(&value.date_time)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| {
            GocaError::ProviderApi(format!(
                "google returned unparseable dateTime {:?}: {err}",
                value.date_time
            ))
        })
}
