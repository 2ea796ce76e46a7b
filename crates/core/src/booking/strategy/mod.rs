//! Calendar provider strategies
//!
//! One strategy per provider. Each decodes the stored credential, opens an
//! authenticated client through the injected factory, resolves the host's
//! identity and creates the remote event. Token refresh is not attempted
//! here; an expired token is a credential error.

mod google;
mod microsoft;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use goca_domain::{GocaError, MeetingDescriptor, ProviderKind, ProviderSettings, Result};

pub use google::GoogleCalendarStrategy;
pub use microsoft::MicrosoftCalendarStrategy;

use super::ports::{CalendarClient, CalendarClientFactory, TokenCodec};

/// Meeting parameters handed to a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingParams {
    pub summary: String,
    pub description: String,
    pub timezone: String,
    pub visitor_name: String,
    pub visitor_email: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
}

impl MeetingParams {
    /// Local start and end, as wall-clock values in `timezone`.
    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.date.and_time(self.time);
        (start, start + Duration::minutes(i64::from(self.duration_minutes)))
    }
}

/// Creates a remote calendar event for one provider
#[async_trait]
pub trait CalendarStrategy: Send + Sync {
    /// Provider this strategy talks to
    fn provider(&self) -> ProviderKind;

    /// Create the remote event using the host's stored credential token.
    ///
    /// # Errors
    /// - `GocaError::Credential` when the token cannot be decoded, has
    ///   expired, or is rejected while resolving the account identity
    /// - `GocaError::ProviderApi` when the provider rejects the event
    async fn create_event(
        &self,
        credential_token: &str,
        meeting: &MeetingParams,
    ) -> Result<MeetingDescriptor>;
}

/// Dependencies shared by every strategy
#[derive(Clone)]
struct StrategyContext {
    codec: Arc<dyn TokenCodec>,
    factory: Arc<dyn CalendarClientFactory>,
    settings: ProviderSettings,
}

impl StrategyContext {
    fn open_client(
        &self,
        provider: ProviderKind,
        credential_token: &str,
    ) -> Result<Arc<dyn CalendarClient>> {
        let token = self.codec.decode(credential_token).map_err(|err| {
            GocaError::Credential(format!(
                "stored {provider} token cannot be decoded: {}",
                err.message()
            ))
        })?;

        if token.is_expired(Utc::now()) {
            return Err(GocaError::Credential(format!(
                "{provider} token has expired; the host must reconnect the calendar"
            )));
        }

        self.factory.for_provider(provider, &token, &self.settings)
    }
}

fn identity_error(provider: ProviderKind, err: GocaError) -> GocaError {
    match err {
        GocaError::Credential(_) => err,
        other => GocaError::Credential(format!(
            "could not resolve {provider} account identity: {}",
            other.message()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_adds_duration() {
        let params = MeetingParams {
            summary: String::new(),
            description: String::new(),
            timezone: "UTC".into(),
            visitor_name: "Bob".into(),
            visitor_email: "bob@x.com".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: NaiveTime::from_hms_opt(23, 45, 0).unwrap(),
            duration_minutes: 30,
        };

        let (start, end) = params.window();
        assert_eq!(start.to_string(), "2024-05-01 23:45:00");
        assert_eq!(end.to_string(), "2024-05-02 00:15:00");
    }

    #[test]
    fn identity_error_keeps_credential_errors() {
        let err = identity_error(ProviderKind::Google, GocaError::Credential("revoked".into()));
        assert_eq!(err, GocaError::Credential("revoked".into()));

        let err = identity_error(ProviderKind::Microsoft, GocaError::Network("timed out".into()));
        assert!(matches!(err, GocaError::Credential(msg) if msg.contains("timed out")));
    }
}
