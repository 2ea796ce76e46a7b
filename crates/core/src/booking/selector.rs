//! Calendar provider selection

use goca_domain::{HostProfile, MeetingLocation, ProviderCredential};

/// Pick the credential to create the remote event with.
///
/// The visitor's requested location is authoritative: a host with a valid
/// credential for a different provider is never substituted. `None` means
/// the booking proceeds without a calendar event.
pub fn select(host: &HostProfile, requested: MeetingLocation) -> Option<&ProviderCredential> {
    host.valid_credential(requested.provider()?)
}
