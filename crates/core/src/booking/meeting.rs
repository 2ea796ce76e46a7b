//! Meeting summary and description

use goca_domain::constants::{DESCRIPTION_NOTES_LABEL, SUMMARY_JOINER};

/// Text shown on the remote calendar event and stored on the booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingText {
    pub summary: String,
    pub description: String,
}

/// Build the meeting text. Notes are embedded as given; no escaping happens
/// at this layer.
pub fn build(title: &str, host_username: &str, visitor_name: &str, notes: &str) -> MeetingText {
    let summary = format!("{title} {SUMMARY_JOINER} {host_username} and {visitor_name}");

    let mut description = format!("Booked by {visitor_name}.");
    if !notes.trim().is_empty() {
        description.push_str("\n\n");
        description.push_str(DESCRIPTION_NOTES_LABEL);
        description.push('\n');
        description.push_str(notes);
    }

    MeetingText { summary, description }
}
