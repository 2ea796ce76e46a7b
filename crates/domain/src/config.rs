//! Configuration structures
//!
//! Loaded by `goca-infra::config::loader` from the environment or a config
//! file. Every section has defaults so partial files are accepted.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_HTTP_TIMEOUT_SECS,
    GOOGLE_API_BASE_URL, MICROSOFT_GRAPH_BASE_URL,
};
use crate::types::ProviderKind;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub providers: ProvidersConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR.to_string() }
    }
}

/// SQLite store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// Per-provider OAuth client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "ProviderSettings::google", deserialize_with = "google_settings")]
    pub google: ProviderSettings,
    #[serde(default = "ProviderSettings::microsoft", deserialize_with = "microsoft_settings")]
    pub microsoft: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self { google: ProviderSettings::google(), microsoft: ProviderSettings::microsoft() }
    }
}

impl ProvidersConfig {
    /// Settings for the given provider.
    pub fn for_provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Google => &self.google,
            ProviderKind::Microsoft => &self.microsoft,
        }
    }
}

/// OAuth client configuration for one calendar provider.
///
/// Injected into the provider strategy at construction; the strategy hands it
/// to the calendar client factory for every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
    /// Empty means the provider's public API host.
    #[serde(default)]
    pub api_base_url: String,
    /// Create an online meeting and attach its join URL after the event is
    /// created. Microsoft only supports this for work/school accounts.
    #[serde(default)]
    pub online_meetings: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderSettings {
    /// Google Calendar defaults.
    pub fn google() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            api_base_url: GOOGLE_API_BASE_URL.to_string(),
            online_meetings: false,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// Microsoft Graph defaults.
    pub fn microsoft() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            api_base_url: MICROSOFT_GRAPH_BASE_URL.to_string(),
            online_meetings: false,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// Same settings pointed at a different API host (used by tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn google_settings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ProviderSettings, D::Error> {
    ProviderSettings::deserialize(deserializer)
        .map(|settings| with_default_base(settings, GOOGLE_API_BASE_URL))
}

fn microsoft_settings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ProviderSettings, D::Error> {
    ProviderSettings::deserialize(deserializer)
        .map(|settings| with_default_base(settings, MICROSOFT_GRAPH_BASE_URL))
}

fn with_default_base(mut settings: ProviderSettings, base_url: &str) -> ProviderSettings {
    if settings.api_base_url.trim().is_empty() {
        settings.api_base_url = base_url.to_string();
    }
    settings
}
