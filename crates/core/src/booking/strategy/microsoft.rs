//! Microsoft (Outlook/365) calendar strategy

use std::sync::Arc;

use async_trait::async_trait;
use goca_domain::{MeetingDescriptor, ProviderKind, ProviderSettings, Result};
use tracing::{debug, warn};

use super::{identity_error, CalendarStrategy, MeetingParams, StrategyContext};
use crate::booking::ports::{
    CalendarClientFactory, CalendarEventRequest, EventAttendee, TokenCodec,
};

/// Creates Outlook calendar events organised by the host.
///
/// The host identity must resolve before anything is written remotely. When
/// online meetings are enabled in the provider settings and the client
/// supports them, a join URL is attached after the event is created; that
/// step is best-effort.
pub struct MicrosoftCalendarStrategy {
    context: StrategyContext,
}

impl MicrosoftCalendarStrategy {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        factory: Arc<dyn CalendarClientFactory>,
        settings: ProviderSettings,
    ) -> Self {
        Self { context: StrategyContext { codec, factory, settings } }
    }
}

#[async_trait]
impl CalendarStrategy for MicrosoftCalendarStrategy {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Microsoft
    }

    async fn create_event(
        &self,
        credential_token: &str,
        meeting: &MeetingParams,
    ) -> Result<MeetingDescriptor> {
        let client = self.context.open_client(ProviderKind::Microsoft, credential_token)?;
        let host_email = client
            .identity_email()
            .await
            .map_err(|err| identity_error(ProviderKind::Microsoft, err))?;

        let (start, end) = meeting.window();
        let request = CalendarEventRequest {
            summary: meeting.summary.clone(),
            description: meeting.description.clone(),
            timezone: meeting.timezone.clone(),
            organizer_email: host_email,
            attendees: vec![EventAttendee {
                name: Some(meeting.visitor_name.clone()),
                email: meeting.visitor_email.clone(),
            }],
            start,
            end,
            request_conference: false,
        };

        let mut descriptor = client.create_event(&request).await?;

        if self.context.settings.online_meetings
            && client.supports_online_meetings()
            && descriptor.join_url.is_none()
        {
            match client.create_online_meeting(&request).await {
                Ok(join_url) => descriptor.join_url = Some(join_url),
                Err(err) => warn!(
                    event_id = %descriptor.event_id,
                    error = %err,
                    "online meeting could not be attached; keeping event without join url"
                ),
            }
        }

        debug!(
            event_id = %descriptor.event_id,
            has_join_url = descriptor.join_url.is_some(),
            "microsoft calendar event created"
        );
        Ok(descriptor)
    }
}
