//! Google Calendar strategy

use std::sync::Arc;

use async_trait::async_trait;
use goca_domain::{MeetingDescriptor, ProviderKind, ProviderSettings, Result};
use tracing::debug;

use super::{identity_error, CalendarStrategy, MeetingParams, StrategyContext};
use crate::booking::ports::{
    CalendarClientFactory, CalendarEventRequest, EventAttendee, TokenCodec,
};

/// Creates Google Calendar events with a Meet conference attached.
///
/// The host is added as an attendee next to the visitor so both receive the
/// invitation.
pub struct GoogleCalendarStrategy {
    context: StrategyContext,
}

impl GoogleCalendarStrategy {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        factory: Arc<dyn CalendarClientFactory>,
        settings: ProviderSettings,
    ) -> Self {
        Self { context: StrategyContext { codec, factory, settings } }
    }
}

#[async_trait]
impl CalendarStrategy for GoogleCalendarStrategy {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn create_event(
        &self,
        credential_token: &str,
        meeting: &MeetingParams,
    ) -> Result<MeetingDescriptor> {
        let client = self.context.open_client(ProviderKind::Google, credential_token)?;
        let host_email = client
            .identity_email()
            .await
            .map_err(|err| identity_error(ProviderKind::Google, err))?;

        let (start, end) = meeting.window();
        let request = CalendarEventRequest {
            summary: meeting.summary.clone(),
            description: meeting.description.clone(),
            timezone: meeting.timezone.clone(),
            organizer_email: host_email.clone(),
            attendees: vec![
                EventAttendee { name: None, email: host_email },
                EventAttendee {
                    name: Some(meeting.visitor_name.clone()),
                    email: meeting.visitor_email.clone(),
                },
            ],
            start,
            end,
            request_conference: true,
        };

        let descriptor = client.create_event(&request).await?;
        debug!(
            event_id = %descriptor.event_id,
            has_join_url = descriptor.join_url.is_some(),
            "google calendar event created"
        );
        Ok(descriptor)
    }
}
