//! Builds provider clients for a decoded token

use std::sync::Arc;
use std::time::Duration;

use goca_core::{CalendarClient, CalendarClientFactory};
use goca_domain::{OAuthToken, ProviderKind, ProviderSettings, Result};

use super::providers::{base_url, GoogleCalendarClient, MicrosoftCalendarClient};
use crate::http::HttpClient;

/// reqwest-backed [`CalendarClientFactory`].
///
/// One connection pool is shared by every client it hands out; the base URL
/// and timeout come from the provider settings on each call.
#[derive(Clone)]
pub struct ReqwestCalendarClientFactory {
    http: HttpClient,
}

impl ReqwestCalendarClientFactory {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl CalendarClientFactory for ReqwestCalendarClientFactory {
    fn for_provider(
        &self,
        provider: ProviderKind,
        token: &OAuthToken,
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn CalendarClient>> {
        let base_url = base_url(settings)?;
        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let http = self.http.clone();

        Ok(match provider {
            ProviderKind::Google => {
                Arc::new(GoogleCalendarClient::new(http, base_url, token.clone(), timeout))
            }
            ProviderKind::Microsoft => {
                Arc::new(MicrosoftCalendarClient::new(http, base_url, token.clone(), timeout))
            }
        })
    }
}
