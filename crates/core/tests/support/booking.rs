//! In-memory ports for booking orchestration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use goca_core::{
    BookingStore, CalendarClient, CalendarClientFactory, CalendarEventRequest, EventTypeStore,
    ProfileStore, TokenCodec,
};
use goca_domain::{
    Booking, BookingForm, BookingId, BookingRecord, BookingRequest, EventType, GocaError,
    HostProfile, MeetingDescriptor, OAuthToken, ProviderCredential, ProviderKind,
    ProviderSettings, Result as DomainResult,
};

/// Serialized token that decodes and never expires.
pub const GOOD_TOKEN: &str = r#"{"access_token":"ya29.good","token_type":"Bearer"}"#;

/// Profile store seeded with fixed hosts.
#[derive(Default, Clone)]
pub struct MockProfileStore {
    hosts: Arc<Mutex<Vec<HostProfile>>>,
    fail_with: Option<GocaError>,
}

impl MockProfileStore {
    pub fn new(hosts: Vec<HostProfile>) -> Self {
        Self { hosts: Arc::new(Mutex::new(hosts)), fail_with: None }
    }

    pub fn failing(err: GocaError) -> Self {
        Self { hosts: Arc::default(), fail_with: Some(err) }
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn get_by_username(&self, username: &str) -> DomainResult<Option<HostProfile>> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(self.hosts.lock().unwrap().iter().find(|h| h.username == username).cloned())
    }
}

/// Catalog keyed by host id.
#[derive(Default, Clone)]
pub struct MockEventTypeStore {
    catalogs: Arc<Mutex<HashMap<i64, Vec<EventType>>>>,
}

impl MockEventTypeStore {
    pub fn with_catalog(self, host_id: i64, catalog: Vec<EventType>) -> Self {
        self.catalogs.lock().unwrap().insert(host_id, catalog);
        self
    }
}

#[async_trait]
impl EventTypeStore for MockEventTypeStore {
    async fn list_for_host(&self, host_id: i64) -> DomainResult<Vec<EventType>> {
        Ok(self.catalogs.lock().unwrap().get(&host_id).cloned().unwrap_or_default())
    }
}

/// Booking store that records every write.
#[derive(Default, Clone)]
pub struct MockBookingStore {
    records: Arc<Mutex<Vec<BookingRecord>>>,
    fail_with: Arc<Mutex<Option<GocaError>>>,
    stalled: Arc<AtomicBool>,
}

impl MockBookingStore {
    pub fn failing(err: GocaError) -> Self {
        let store = Self::default();
        *store.fail_with.lock().unwrap() = Some(err);
        store
    }

    /// Store whose writes never complete.
    pub fn stalled() -> Self {
        let store = Self::default();
        store.stalled.store(true, Ordering::SeqCst);
        store
    }

    pub fn records(&self) -> Vec<BookingRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingStore for MockBookingStore {
    async fn create(&self, record: BookingRecord) -> DomainResult<BookingId> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        records.push(record);
        Ok(BookingId(records.len() as i64))
    }

    async fn get(&self, id: BookingId) -> DomainResult<Option<Booking>> {
        let records = self.records.lock().unwrap();
        let index = usize::try_from(id.0 - 1).ok();
        Ok(index.and_then(|i| records.get(i)).map(|record| Booking {
            id,
            record: record.clone(),
            created_at: Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap(),
        }))
    }
}

/// Token codec backed by serde_json.
pub struct JsonCodec;

impl TokenCodec for JsonCodec {
    fn decode(&self, raw: &str) -> DomainResult<OAuthToken> {
        serde_json::from_str(raw).map_err(|e| GocaError::Validation(e.to_string()))
    }
}

/// Behaviour of the fake calendar client.
#[derive(Debug, Clone, Default)]
pub struct ClientScript {
    pub identity_error: Option<GocaError>,
    pub create_error: Option<GocaError>,
    pub online_meetings: bool,
    pub online_meeting_error: Option<GocaError>,
}

/// Counts and captures every call made through clients it builds.
#[derive(Default)]
pub struct CallLog {
    pub factory_calls: AtomicUsize,
    pub identity_calls: AtomicUsize,
    pub online_meeting_calls: AtomicUsize,
    pub created: Mutex<Vec<(ProviderKind, CalendarEventRequest)>>,
    pub settings: Mutex<Vec<ProviderSettings>>,
}

impl CallLog {
    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn remote_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
            + self.create_calls()
            + self.online_meeting_calls.load(Ordering::SeqCst)
    }
}

/// Factory handing out scripted clients.
#[derive(Clone, Default)]
pub struct MockCalendarFactory {
    pub log: Arc<CallLog>,
    script: ClientScript,
}

impl MockCalendarFactory {
    pub fn new(script: ClientScript) -> Self {
        Self { log: Arc::default(), script }
    }
}

impl CalendarClientFactory for MockCalendarFactory {
    fn for_provider(
        &self,
        provider: ProviderKind,
        _token: &OAuthToken,
        settings: &ProviderSettings,
    ) -> DomainResult<Arc<dyn CalendarClient>> {
        self.log.factory_calls.fetch_add(1, Ordering::SeqCst);
        self.log.settings.lock().unwrap().push(settings.clone());
        Ok(Arc::new(MockCalendarClient {
            provider,
            log: Arc::clone(&self.log),
            script: self.script.clone(),
        }))
    }
}

struct MockCalendarClient {
    provider: ProviderKind,
    log: Arc<CallLog>,
    script: ClientScript,
}

#[async_trait]
impl CalendarClient for MockCalendarClient {
    async fn identity_email(&self) -> DomainResult<String> {
        self.log.identity_calls.fetch_add(1, Ordering::SeqCst);
        match &self.script.identity_error {
            Some(err) => Err(err.clone()),
            None => Ok("alice@host.example".to_string()),
        }
    }

    async fn create_event(&self, event: &CalendarEventRequest) -> DomainResult<MeetingDescriptor> {
        self.log.created.lock().unwrap().push((self.provider, event.clone()));
        if let Some(err) = &self.script.create_error {
            return Err(err.clone());
        }
        Ok(MeetingDescriptor {
            provider: self.provider,
            event_id: format!("{}-evt-1", self.provider),
            join_url: match self.provider {
                ProviderKind::Google => Some("https://meet.google.com/abc-defg-hij".into()),
                ProviderKind::Microsoft => None,
            },
            html_link: Some(format!("https://calendar.example/{}", self.provider)),
            start: event.start.and_utc(),
            end: event.end.and_utc(),
        })
    }

    fn supports_online_meetings(&self) -> bool {
        self.script.online_meetings
    }

    async fn create_online_meeting(&self, _event: &CalendarEventRequest) -> DomainResult<String> {
        self.log.online_meeting_calls.fetch_add(1, Ordering::SeqCst);
        match &self.script.online_meeting_error {
            Some(err) => Err(err.clone()),
            None => Ok("https://teams.microsoft.com/l/meetup-join/xyz".to_string()),
        }
    }
}

pub fn intro_call() -> EventType {
    EventType { id: 7, title: "Intro Call".into(), duration_minutes: 30, timezone: "UTC".into() }
}

pub fn alice(credentials: Vec<ProviderCredential>) -> HostProfile {
    HostProfile {
        id: 1,
        username: "alice".into(),
        display_name: Some("Alice".into()),
        email: Some("alice@host.example".into()),
        credentials,
    }
}

pub fn form(location: &str) -> BookingForm {
    BookingForm {
        username: "alice".into(),
        name: "Bob Lee".into(),
        email: "bob@x.com".into(),
        event_type_id: 7,
        date: "2024-05-01".into(),
        time: "10:00".into(),
        meeting_location: Some(location.into()),
        notes: "Looking forward to it".into(),
    }
}

pub fn request(location: &str) -> BookingRequest {
    form(location).validate().unwrap()
}
