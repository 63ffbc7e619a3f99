//! Deterministic, network-free collaborator implementations.
//!
//! These power the default wiring and the test suite: a keyword-based
//! intent classifier, a heuristic detail extractor, a template-rendering
//! text generator, and calendar stubs with configurable failure behavior.
//! They are intentionally rule-based so every workflow path is reproducible
//! without model access.

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use rustc_hash::FxHashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::details::EventDetails;
use crate::prompts::{PromptTemplate, render};
use crate::state::UserIntent;

use super::{
    BookingConfirmation, Calendar, CollaboratorError, DetailExtractor, IntentClassifier,
    TextGenerator,
};

// ============================================================================
// Intent classification
// ============================================================================

/// Keyword-driven intent classifier.
///
/// Precedence mirrors the classification prompt of the upstream assistant:
/// cancellation beats scheduling (a "cancel the meeting" utterance contains
/// both), reminders and availability checks are recognized before the
/// generic scheduling vocabulary, greetings come last before `Unknown`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordIntentClassifier;

impl KeywordIntentClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn classify_text(text: &str) -> UserIntent {
        let lowered = text.to_lowercase();
        let tokens: Vec<String> = lowered
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()).to_string())
            .collect();
        let has_token = |word: &str| tokens.iter().any(|t| t == word);

        if lowered.contains("cancel") {
            return UserIntent::CancelMeeting;
        }
        if lowered.contains("remind") {
            return UserIntent::Reminder;
        }
        if lowered.contains("availab") || lowered.contains("am i free") || has_token("free") {
            return UserIntent::CheckAvailability;
        }
        if lowered.contains("schedule")
            || lowered.contains("book")
            || lowered.contains("set up")
            || lowered.contains("meeting")
            || lowered.contains("appointment")
        {
            return UserIntent::ScheduleMeeting;
        }
        if has_token("hello")
            || has_token("hi")
            || has_token("hey")
            || has_token("thanks")
            || lowered.contains("thank you")
            || lowered.contains("good morning")
            || lowered.contains("good afternoon")
            || lowered.contains("how are you")
        {
            return UserIntent::GeneralChat;
        }
        UserIntent::Unknown
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, text: &str) -> Result<UserIntent, CollaboratorError> {
        Ok(Self::classify_text(text))
    }
}

// ============================================================================
// Detail extraction
// ============================================================================

/// Words that describe dates or times rather than people.
const DATE_WORDS: &[&str] = &[
    "today", "tomorrow", "tonight", "noon", "midnight", "morning", "afternoon", "evening", "next",
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
    "february", "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december",
];

/// Nouns that name a meeting type and double as its title.
const TITLE_WORDS: &[&str] = &[
    "standup",
    "stand-up",
    "sync",
    "retro",
    "retrospective",
    "review",
    "planning",
    "1:1",
    "one-on-one",
    "demo",
    "interview",
    "catchup",
    "catch-up",
    "kickoff",
    "check-in",
];

/// Rule-based detail extractor.
///
/// Recognizes the common shapes of scheduling requests:
/// - durations like `30 minutes`, `45min`, `1 hour`;
/// - participants after `with`, capitalized or e-mail-shaped, joined by
///   `and`;
/// - date/time fragments: day words, `tomorrow 9am`, `10:00`, ISO dates;
/// - a title from quoted text or a known meeting noun (`standup`, `retro`);
///   the bare word "meeting" is treated as generic, not a title;
/// - a location from `room N` or `in <Place>`.
///
/// Anything the rules do not recognize stays null and is collected through
/// the seek-more-info interrupt instead of being guessed.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicDetailExtractor;

impl HeuristicDetailExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';'))
}

fn is_capitalized_name(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            first.is_uppercase() && chars.all(|c| c.is_alphabetic() || c == '-' || c == '\'')
        }
        None => false,
    }
}

fn parse_duration_minutes(number: &str, unit: &str) -> Option<i64> {
    let value: i64 = number.parse().ok()?;
    let unit = unit.to_lowercase();
    if unit.starts_with("min") || unit == "m" {
        Some(value)
    } else if unit.starts_with("hour") || unit.starts_with("hr") || unit == "h" {
        Some(value * 60)
    } else {
        None
    }
}

/// Split a combined token like `45min` or `2h` into number and unit.
fn split_combined_duration(token: &str) -> Option<(String, String)> {
    let digits: String = token.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() || digits.len() == token.len() {
        return None;
    }
    let unit: String = token.chars().skip(digits.len()).collect();
    if unit.chars().all(|c| c.is_alphabetic()) {
        Some((digits, unit))
    } else {
        None
    }
}

fn quoted_span(text: &str) -> Option<String> {
    for quote in ['\'', '"'] {
        let mut parts = text.splitn(3, quote);
        let _before = parts.next()?;
        if let (Some(inner), Some(_after)) = (parts.next(), parts.next()) {
            let inner = inner.trim();
            if !inner.is_empty() {
                return Some(inner.to_string());
            }
        }
    }
    None
}

fn extract_details(text: &str) -> EventDetails {
    let raw_tokens: Vec<&str> = text.split_whitespace().collect();
    let tokens: Vec<&str> = raw_tokens.iter().map(|t| strip_punctuation(t)).collect();
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let mut consumed = vec![false; tokens.len()];

    // Duration: "<n> minutes", "<n> hours", or combined "45min" / "2h".
    let mut duration: Option<i64> = None;
    for i in 0..tokens.len() {
        if consumed[i] {
            continue;
        }
        if tokens[i].chars().all(|c| c.is_ascii_digit()) && i + 1 < tokens.len() {
            if let Some(minutes) = parse_duration_minutes(tokens[i], &lowered[i + 1]) {
                duration = Some(minutes);
                consumed[i] = true;
                consumed[i + 1] = true;
                break;
            }
        }
        if let Some((number, unit)) = split_combined_duration(tokens[i]) {
            if let Some(minutes) = parse_duration_minutes(&number, &unit) {
                duration = Some(minutes);
                consumed[i] = true;
                break;
            }
        }
    }

    // Title: quoted span first, then a known meeting noun.
    let mut title = quoted_span(text);
    if title.is_none() {
        for i in 0..tokens.len() {
            if consumed[i] {
                continue;
            }
            if TITLE_WORDS.contains(&lowered[i].as_str()) {
                title = Some(lowered[i].clone());
                consumed[i] = true;
                break;
            }
        }
    }

    // Participants: capitalized names (or e-mail addresses) after "with".
    let mut participants: Vec<String> = Vec::new();
    if let Some(with_idx) = lowered.iter().position(|t| t == "with") {
        consumed[with_idx] = true;
        for i in (with_idx + 1)..tokens.len() {
            let token = tokens[i];
            if lowered[i] == "and" || token == "&" {
                consumed[i] = true;
                continue;
            }
            let is_email = token.contains('@');
            let is_name =
                is_capitalized_name(token) && !DATE_WORDS.contains(&lowered[i].as_str());
            if is_email || is_name {
                participants.push(token.to_string());
                consumed[i] = true;
            } else {
                break;
            }
        }
    }

    // Location: "room <x>" or "in <Place>"; claimed before the date/time
    // scan so a room number is not mistaken for a time fragment.
    let mut location: Option<String> = None;
    for i in 0..tokens.len() {
        if consumed[i] {
            continue;
        }
        if lowered[i] == "room" && i + 1 < tokens.len() {
            location = Some(format!("room {}", tokens[i + 1]));
            consumed[i] = true;
            consumed[i + 1] = true;
            break;
        }
        if lowered[i] == "in"
            && i + 1 < tokens.len()
            && is_capitalized_name(tokens[i + 1])
            && !DATE_WORDS.contains(&lowered[i + 1].as_str())
        {
            location = Some(tokens[i + 1].to_string());
            consumed[i] = true;
            consumed[i + 1] = true;
            break;
        }
    }

    // Date/time: day words plus digit-bearing fragments not already
    // claimed by the duration or location.
    let mut date_time_parts: Vec<&str> = Vec::new();
    for i in 0..tokens.len() {
        if consumed[i] {
            continue;
        }
        let word_match = DATE_WORDS.contains(&lowered[i].as_str());
        let digit_match = lowered[i].chars().any(|c| c.is_ascii_digit());
        if word_match || digit_match {
            date_time_parts.push(tokens[i]);
            consumed[i] = true;
        }
    }

    EventDetails {
        title,
        date_time: if date_time_parts.is_empty() {
            None
        } else {
            Some(date_time_parts.join(" "))
        },
        participants: if participants.is_empty() {
            None
        } else {
            Some(participants)
        },
        duration,
        location,
    }
}

#[async_trait]
impl DetailExtractor for HeuristicDetailExtractor {
    async fn extract(
        &self,
        utterance: &str,
        _current: &EventDetails,
    ) -> Result<EventDetails, CollaboratorError> {
        Ok(extract_details(utterance))
    }
}

// ============================================================================
// Text generation
// ============================================================================

/// Text generator that renders the built-in templates verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateTextGenerator;

impl TemplateTextGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextGenerator for TemplateTextGenerator {
    async fn generate(
        &self,
        template: PromptTemplate,
        vars: &FxHashMap<String, String>,
    ) -> Result<String, CollaboratorError> {
        Ok(render(template.body(), vars))
    }
}

// ============================================================================
// Calendar stubs
// ============================================================================

/// Datetime formats accepted when computing a concrete end time.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

fn event_window(details: &EventDetails) -> (String, String) {
    let start = details
        .date_time
        .clone()
        .unwrap_or_else(|| "unscheduled".to_string());
    let minutes = details.duration.unwrap_or(60);
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&start, format) {
            let end = parsed + Duration::minutes(minutes);
            return (
                parsed.format("%Y-%m-%d %H:%M").to_string(),
                end.format("%Y-%m-%d %H:%M").to_string(),
            );
        }
    }
    // Free-form times ("tomorrow 9am") stay as given.
    (start.clone(), format!("{start} + {minutes}min"))
}

fn deterministic_event_id(credential_ref: &str, details: &EventDetails) -> String {
    let mut hasher = rustc_hash::FxHasher::default();
    credential_ref.hash(&mut hasher);
    details.title.hash(&mut hasher);
    details.date_time.hash(&mut hasher);
    details.participants.hash(&mut hasher);
    format!("evt-{:08x}", hasher.finish() as u32)
}

/// Calendar stub that always books successfully.
///
/// Event ids are a stable hash of the credential and details, so repeated
/// bookings of the same request are observably idempotent in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineCalendar;

impl OfflineCalendar {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Calendar for OfflineCalendar {
    async fn book(
        &self,
        credential_ref: &str,
        details: &EventDetails,
    ) -> Result<BookingConfirmation, CollaboratorError> {
        if credential_ref.trim().is_empty() {
            return Err(CollaboratorError::Auth {
                message: "no credential reference for calendar access".to_string(),
            });
        }
        let event_id = deterministic_event_id(credential_ref, details);
        let (start_time, end_time) = event_window(details);
        Ok(BookingConfirmation {
            event_link: Some(format!("https://calendar.example/event/{event_id}")),
            event_id,
            start_time,
            end_time,
        })
    }
}

/// Calendar stub that fails every booking attempt.
#[derive(Debug, Clone)]
pub struct FailingCalendar {
    pub message: String,
}

impl FailingCalendar {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Calendar for FailingCalendar {
    async fn book(
        &self,
        _credential_ref: &str,
        _details: &EventDetails,
    ) -> Result<BookingConfirmation, CollaboratorError> {
        Err(CollaboratorError::Provider {
            provider: "calendar",
            message: self.message.clone(),
        })
    }
}

/// Calendar stub that fails a fixed number of times, then succeeds.
///
/// Exercises the retry path of the operation-approval flow.
#[derive(Debug, Default)]
pub struct FlakyCalendar {
    failures_remaining: AtomicUsize,
}

impl FlakyCalendar {
    #[must_use]
    pub fn failing_times(failures: usize) -> Self {
        Self {
            failures_remaining: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl Calendar for FlakyCalendar {
    async fn book(
        &self,
        credential_ref: &str,
        details: &EventDetails,
    ) -> Result<BookingConfirmation, CollaboratorError> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(CollaboratorError::Provider {
                provider: "calendar",
                message: "temporary calendar outage".to_string(),
            });
        }
        OfflineCalendar.book(credential_ref, details).await
    }
}

// ============================================================================
// Failing doubles for degradation tests
// ============================================================================

/// Classifier double whose calls always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingClassifier;

#[async_trait]
impl IntentClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<UserIntent, CollaboratorError> {
        Err(CollaboratorError::Timeout {
            provider: "intent-model",
        })
    }
}

/// Generator double whose calls always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(
        &self,
        _template: PromptTemplate,
        _vars: &FxHashMap<String, String>,
    ) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::Timeout {
            provider: "text-model",
        })
    }
}

/// Extractor double whose calls always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingExtractor;

#[async_trait]
impl DetailExtractor for FailingExtractor {
    async fn extract(
        &self,
        _utterance: &str,
        _current: &EventDetails,
    ) -> Result<EventDetails, CollaboratorError> {
        Err(CollaboratorError::Provider {
            provider: "extraction-model",
            message: "malformed structured output".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Keyword precedence: cancel beats the scheduling vocabulary.
    fn test_classifier_precedence() {
        assert_eq!(
            KeywordIntentClassifier::classify_text("please cancel the meeting"),
            UserIntent::CancelMeeting
        );
        assert_eq!(
            KeywordIntentClassifier::classify_text("remind me to call Dana"),
            UserIntent::Reminder
        );
        assert_eq!(
            KeywordIntentClassifier::classify_text("book a meeting"),
            UserIntent::ScheduleMeeting
        );
        assert_eq!(
            KeywordIntentClassifier::classify_text("is Jane available on Friday"),
            UserIntent::CheckAvailability
        );
        assert_eq!(
            KeywordIntentClassifier::classify_text("hello there"),
            UserIntent::GeneralChat
        );
        assert_eq!(
            KeywordIntentClassifier::classify_text("xyzzy"),
            UserIntent::Unknown
        );
    }

    #[test]
    /// The canonical fully-specified request extracts all four required fields.
    fn test_extract_full_request() {
        let details =
            extract_details("Schedule a standup with Jane tomorrow 9am for 30 minutes");
        assert_eq!(details.title.as_deref(), Some("standup"));
        assert_eq!(details.participants, Some(vec!["Jane".to_string()]));
        assert_eq!(details.date_time.as_deref(), Some("tomorrow 9am"));
        assert_eq!(details.duration, Some(30));
    }

    #[test]
    /// A bare "book a meeting" yields no concrete details.
    fn test_extract_sparse_request() {
        let details = extract_details("book a meeting");
        assert!(details.title.is_none());
        assert!(details.date_time.is_none());
        assert!(details.participants.is_none());
        assert!(details.duration.is_none());
    }

    #[test]
    /// Multiple participants joined by "and" are all captured.
    fn test_extract_multiple_participants() {
        let details = extract_details("set up a sync with Jane and Bob on Friday for 1 hour");
        assert_eq!(
            details.participants,
            Some(vec!["Jane".to_string(), "Bob".to_string()])
        );
        assert_eq!(details.duration, Some(60));
        assert_eq!(details.date_time.as_deref(), Some("Friday"));
    }

    #[test]
    /// Quoted text wins as the title; combined duration tokens parse.
    fn test_extract_quoted_title_and_combined_duration() {
        let details = extract_details("book 'Quarterly Review' tomorrow 10:00 for 45min");
        assert_eq!(details.title.as_deref(), Some("Quarterly Review"));
        assert_eq!(details.duration, Some(45));
        assert_eq!(details.date_time.as_deref(), Some("tomorrow 10:00"));
    }

    #[test]
    /// Room mentions land in the location field.
    fn test_extract_location() {
        let details = extract_details("standup with Jane tomorrow 9am for 15 minutes room 4");
        assert_eq!(details.location.as_deref(), Some("room 4"));
    }

    #[tokio::test]
    /// Offline bookings are deterministic and carry a link.
    async fn test_offline_calendar_booking() {
        let details = EventDetails {
            title: Some("Standup".into()),
            date_time: Some("2025-05-01 10:00".into()),
            participants: Some(vec!["jane@example.com".into()]),
            duration: Some(30),
            location: None,
        };
        let first = OfflineCalendar.book("session-1", &details).await.unwrap();
        let second = OfflineCalendar.book("session-1", &details).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.start_time, "2025-05-01 10:00");
        assert_eq!(first.end_time, "2025-05-01 10:30");
        assert!(first.event_link.as_deref().unwrap().contains(&first.event_id));
    }

    #[tokio::test]
    /// Booking without a credential reference is an auth failure.
    async fn test_offline_calendar_requires_credential() {
        let result = OfflineCalendar.book("", &EventDetails::default()).await;
        assert!(matches!(result, Err(CollaboratorError::Auth { .. })));
    }

    #[tokio::test]
    /// Flaky calendar fails the configured number of times, then books.
    async fn test_flaky_calendar_recovers() {
        let calendar = FlakyCalendar::failing_times(2);
        let details = EventDetails::default();
        assert!(calendar.book("s", &details).await.is_err());
        assert!(calendar.book("s", &details).await.is_err());
        assert!(calendar.book("s", &details).await.is_ok());
    }
}
