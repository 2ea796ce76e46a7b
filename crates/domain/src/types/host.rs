//! Host-side types: profiles, provider credentials and event types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_domain_str_conversions;

/// Calendar provider a host can connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    Microsoft,
}

impl_domain_str_conversions!(ProviderKind {
    Google => "google",
    Microsoft => "microsoft",
});

/// Stored connection to a calendar provider.
///
/// `token` is the opaque serialized OAuth token. A credential flagged `valid`
/// must decode; a decode failure is a data-integrity error.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredential {
    pub provider: ProviderKind,
    pub valid: bool,
    pub token: String,
}

impl ProviderCredential {
    pub fn new(provider: ProviderKind, token: impl Into<String>) -> Self {
        Self { provider, valid: true, token: token.into() }
    }

    /// A credential that was disconnected or revoked.
    pub fn revoked(provider: ProviderKind) -> Self {
        Self { provider, valid: false, token: String::new() }
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("provider", &self.provider)
            .field("valid", &self.valid)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Host profile as read from the profile store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, skip_serializing)]
    pub credentials: Vec<ProviderCredential>,
}

impl HostProfile {
    /// First credential for `provider` whose validity flag is set.
    pub fn valid_credential(&self, provider: ProviderKind) -> Option<&ProviderCredential> {
        self.credentials.iter().find(|c| c.provider == provider && c.valid)
    }
}

/// Bookable meeting template published by a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    pub title: String,
    pub duration_minutes: u32,
    /// IANA timezone name, e.g. `Europe/Paris`
    pub timezone: String,
}

/// Public view of a host for the booking page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPage {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub event_types: Vec<EventType>,
}

impl HostPage {
    pub fn new(profile: &HostProfile, event_types: Vec<EventType>) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            event_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(credentials: Vec<ProviderCredential>) -> HostProfile {
        HostProfile {
            id: 1,
            username: "alice".into(),
            display_name: None,
            email: None,
            credentials,
        }
    }

    #[test]
    fn valid_credential_skips_revoked_entries() {
        let profile = host(vec![
            ProviderCredential::revoked(ProviderKind::Google),
            ProviderCredential::new(ProviderKind::Google, "{}"),
        ]);

        let credential = profile.valid_credential(ProviderKind::Google).unwrap();
        assert!(credential.valid);
        assert!(profile.valid_credential(ProviderKind::Microsoft).is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let credential = ProviderCredential::new(ProviderKind::Google, "secret-token");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn provider_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ProviderKind::Microsoft).unwrap(), "\"microsoft\"");
        assert_eq!("Google".parse::<ProviderKind>().unwrap(), ProviderKind::Google);
    }

    #[test]
    fn host_page_never_carries_credentials() {
        let profile = host(vec![ProviderCredential::new(ProviderKind::Google, "tok")]);
        let page = HostPage::new(&profile, Vec::new());
        let json = serde_json::to_string(&page).unwrap();
        assert!(!json.contains("tok"));
        assert_eq!(page.username, "alice");
    }
}
