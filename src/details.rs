//! Collected event details and the per-intent required-field policy.
//!
//! [`EventDetails`] is the partially-filled record the collect-info node
//! accumulates across turns. Fields are independently nullable and merges
//! are monotonic: a merge only replaces a field when the incoming value
//! actually carries data, so previously known details are never silently
//! discarded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::UserIntent;

/// A single field of [`EventDetails`], used to name missing data in
/// prompts and routing decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailField {
    Title,
    DateTime,
    Participants,
    Duration,
    Location,
}

impl DetailField {
    /// Stable string form, matching the serialized field names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailField::Title => "title",
            DetailField::DateTime => "date_time",
            DetailField::Participants => "participants",
            DetailField::Duration => "duration",
            DetailField::Location => "location",
        }
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required fields for a full scheduling flow.
const SCHEDULING_REQUIRED: &[DetailField] = &[
    DetailField::Title,
    DetailField::DateTime,
    DetailField::Participants,
    DetailField::Duration,
];

/// Required fields for the lightweight reminder-style flow.
const REMINDER_REQUIRED: &[DetailField] = &[DetailField::Title, DetailField::DateTime];

/// The required-field set for a given intent.
///
/// Scheduling needs a title, a time, participants, and a duration; a
/// reminder only needs a topic (title) and a time. Intents without a
/// dedicated collection flow fall back to the lightweight set.
#[must_use]
pub fn required_fields(intent: UserIntent) -> &'static [DetailField] {
    match intent {
        UserIntent::ScheduleMeeting => SCHEDULING_REQUIRED,
        _ => REMINDER_REQUIRED,
    }
}

/// The partially-filled record of everything known about the event being
/// arranged. Used for meetings and reminders alike.
///
/// # Examples
///
/// ```
/// use confab::details::EventDetails;
///
/// let mut known = EventDetails {
///     title: Some("Standup".into()),
///     ..Default::default()
/// };
/// let incoming = EventDetails {
///     date_time: Some("2025-05-01 10:00".into()),
///     ..Default::default()
/// };
/// known.merge_from(incoming);
///
/// // Merging never drops previously known data.
/// assert_eq!(known.title.as_deref(), Some("Standup"));
/// assert_eq!(known.date_time.as_deref(), Some("2025-05-01 10:00"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub title: Option<String>,
    pub date_time: Option<String>,
    pub participants: Option<Vec<String>>,
    /// Duration in minutes.
    pub duration: Option<i64>,
    pub location: Option<String>,
}

impl EventDetails {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given field holds usable data (non-null and non-empty).
    #[must_use]
    pub fn has(&self, field: DetailField) -> bool {
        match field {
            DetailField::Title => matches!(&self.title, Some(t) if !t.trim().is_empty()),
            DetailField::DateTime => matches!(&self.date_time, Some(d) if !d.trim().is_empty()),
            DetailField::Participants => matches!(&self.participants, Some(p) if !p.is_empty()),
            DetailField::Duration => matches!(self.duration, Some(d) if d > 0),
            DetailField::Location => matches!(&self.location, Some(l) if !l.trim().is_empty()),
        }
    }

    /// Required fields for `intent` that are still missing, in declaration order.
    #[must_use]
    pub fn missing_for(&self, intent: UserIntent) -> Vec<DetailField> {
        required_fields(intent)
            .iter()
            .copied()
            .filter(|f| !self.has(*f))
            .collect()
    }

    /// True when every required field for `intent` holds usable data.
    #[must_use]
    pub fn is_complete_for(&self, intent: UserIntent) -> bool {
        self.missing_for(intent).is_empty()
    }

    /// Merge `incoming` into this record, field by field.
    ///
    /// Monotonic-non-destructive: a field is only replaced when the incoming
    /// value carries data; null or empty incoming values leave the existing
    /// value untouched.
    pub fn merge_from(&mut self, incoming: EventDetails) {
        let has_title = incoming.has(DetailField::Title);
        let has_date_time = incoming.has(DetailField::DateTime);
        let has_participants = incoming.has(DetailField::Participants);
        let has_duration = incoming.has(DetailField::Duration);
        let has_location = incoming.has(DetailField::Location);
        if has_title {
            self.title = incoming.title;
        }
        if has_date_time {
            self.date_time = incoming.date_time;
        }
        if has_participants {
            self.participants = incoming.participants;
        }
        if has_duration {
            self.duration = incoming.duration;
        }
        if has_location {
            self.location = incoming.location;
        }
    }

    /// Confirmation summary shown once all required fields are collected.
    #[must_use]
    pub fn completion_message(&self, intent: UserIntent) -> String {
        let title = self.title.as_deref().unwrap_or("your event");
        let date_time = self.date_time.as_deref().unwrap_or("the agreed time");
        if intent == UserIntent::Reminder {
            return format!("Perfect! I'll set a reminder for '{title}' on {date_time}.");
        }
        let participants = self
            .participants
            .as_ref()
            .filter(|p| !p.is_empty())
            .map_or_else(|| "unknown participants".to_string(), |p| p.join(", "));
        let duration = self
            .duration
            .map_or_else(|| "unknown duration".to_string(), |d| format!("{d} minutes"));
        let mut message = format!(
            "Perfect! I'll schedule your meeting '{title}' for {date_time} \
             with {participants} for {duration}"
        );
        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            message.push_str(&format!(" at {location}"));
        }
        message.push('.');
        message
    }
}
