//! Event-type resolution against a host's catalog

use goca_domain::EventType;

/// Find the event type with `requested_id`.
///
/// Linear scan in catalog order; the first match wins. `None` means the
/// visitor asked for an event type the host does not publish.
pub fn resolve(catalog: &[EventType], requested_id: i64) -> Option<&EventType> {
    catalog.iter().find(|event_type| event_type.id == requested_id)
}
