//! Microsoft Graph (Outlook/365) calendar client

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use goca_core::{CalendarClient, CalendarEventRequest};
use goca_domain::{GocaError, MeetingDescriptor, OAuthToken, ProviderKind, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{created_window, format_local, read_json, requested_window};
use crate::http::HttpClient;

const ME_PATH: &str = "/v1.0/me";
const EVENTS_PATH: &str = "/v1.0/me/events";
const ONLINE_MEETINGS_PATH: &str = "/v1.0/me/onlineMeetings";
/// Makes Graph echo event times in UTC regardless of the mailbox zone.
const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;
const GRAPH_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Microsoft Graph client bound to one host's access token
pub struct MicrosoftCalendarClient {
    http: HttpClient,
    base_url: String,
    token: OAuthToken,
    timeout: Duration,
}

impl MicrosoftCalendarClient {
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
impl CalendarClient for MicrosoftCalendarClient {
    async fn identity_email(&self) -> Result<String> {
        let response = self.http.send(self.request(Method::GET, ME_PATH)).await?;
        let me: GraphUser = read_json(ProviderKind::Microsoft, response).await?;

        me.mail
            .into_iter()
            .chain(me.user_principal_name)
            .find(|address| !address.trim().is_empty())
            .ok_or_else(|| GocaError::Credential("microsoft account has no mail address".into()))
    }

    async fn create_event(&self, event: &CalendarEventRequest) -> Result<MeetingDescriptor> {
        let builder = self
            .request(Method::POST, EVENTS_PATH)
            .header("Prefer", OUTLOOK_TIMEZONE_HEADER)
            .json(&GraphEventBody::from_request(event));

        let response = self.http.send(builder).await?;
        let created: GraphEvent = read_json(ProviderKind::Microsoft, response).await?;
        debug!(event_id = %created.id, "microsoft event created");

        let echoed = parse_utc(created.start.as_ref())
            .and_then(|start| parse_utc(created.end.as_ref()).map(|end| (start, end)));
        let (start, end) = created_window(ProviderKind::Microsoft, &created.id, echoed, event);

        Ok(MeetingDescriptor {
            provider: ProviderKind::Microsoft,
            start,
            end,
            join_url: created.online_meeting.and_then(|meeting| meeting.join_url),
            html_link: created.web_link,
            event_id: created.id,
        })
    }

    /// Work and school accounts only; personal accounts reject the call.
    fn supports_online_meetings(&self) -> bool {
        true
    }

    async fn create_online_meeting(&self, event: &CalendarEventRequest) -> Result<String> {
        // onlineMeetings takes instants, not wall-clock values with a zone
        let (start, end) = requested_window(event);
        let body = OnlineMeetingBody {
            subject: event.summary.clone(),
            start_date_time: start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end_date_time: end.to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        let response =
            self.http.send(self.request(Method::POST, ONLINE_MEETINGS_PATH).json(&body)).await?;
        let meeting: OnlineMeeting = read_json(ProviderKind::Microsoft, response).await?;

        meeting.join_web_url.ok_or_else(|| {
            GocaError::ProviderApi("online meeting response has no joinWebUrl".into())
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphUser {
    mail: Option<String>,
    user_principal_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphEventBody {
    subject: String,
    body: ItemBody,
    start: GraphDateTime,
    end: GraphDateTime,
    attendees: Vec<GraphAttendee>,
    organizer: GraphRecipient,
}

impl GraphEventBody {
    fn from_request(event: &CalendarEventRequest) -> Self {
        Self {
            subject: event.summary.clone(),
            body: ItemBody { content_type: "text".into(), content: event.description.clone() },
            start: GraphDateTime {
                date_time: format_local(event.start),
                time_zone: event.timezone.clone(),
            },
            end: GraphDateTime { date_time: format_local(event.end), time_zone: event.timezone.clone() },
            attendees: event
                .attendees
                .iter()
                .map(|a| GraphAttendee {
                    email_address: EmailAddress { address: a.email.clone(), name: a.name.clone() },
                    kind: "required".into(),
                })
                .collect(),
            organizer: GraphRecipient {
                email_address: EmailAddress { address: event.organizer_email.clone(), name: None },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemBody {
    content_type: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDateTime {
    #[serde(default)]
    date_time: String,
    #[serde(default)]
    time_zone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphAttendee {
    email_address: EmailAddress,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphRecipient {
    email_address: EmailAddress,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphEvent {
    id: String,
    web_link: Option<String>,
    online_meeting: Option<GraphOnlineMeetingInfo>,
    start: Option<GraphDateTime>,
    end: Option<GraphDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphOnlineMeetingInfo {
    join_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OnlineMeetingBody {
    subject: String,
    start_date_time: String,
    end_date_time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OnlineMeeting {
    #[serde(alias = "joinUrl")]
    join_web_url: Option<String>,
}

/// Graph answers with `2024-05-01T10:00:00.0000000` and `timeZone: "UTC"`
/// when asked for UTC.
fn parse_utc(value: Option<&GraphDateTime>) -> Result<DateTime<Utc>> {
    let value = value
        .ok_or_else(|| GocaError::ProviderApi("microsoft event has no start/end".into()))?;
    if !value.time_zone.eq_ignore_ascii_case("utc") {
        return Err(GocaError::ProviderApi(format!(
            "microsoft returned {:?} instead of UTC",
            value.time_zone
        )));
    }

    let raw = value.date_time.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(raw, GRAPH_DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| {
            GocaError::ProviderApi(format!(
                "microsoft returned unparseable dateTime {:?}: {err}",
                value.date_time
            ))
        })
}
