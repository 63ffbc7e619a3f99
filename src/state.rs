//! Conversation state management for the confab workflow engine.
//!
//! This module provides the per-session state container carried between
//! workflow nodes, together with the closed [`UserIntent`] enumeration set
//! by the classify-intent node.
//!
//! # Lifecycle
//!
//! A [`ConversationState`] is created empty on the first message of a
//! session, mutated by each node invocation, and reset to empty by the
//! terminal node. The reset closes out the current exchange and primes the
//! container for the next topic without discarding the session identifier
//! (which lives in the checkpoint key, not in the state).
//!
//! # Examples
//!
//! ```
//! use confab::state::{ConversationState, UserIntent};
//!
//! let mut state = ConversationState::new_with_human_message("Book a standup");
//! state.user_intent = Some(UserIntent::ScheduleMeeting);
//! state.push_assistant("Which day works for you?");
//!
//! assert_eq!(state.messages.len(), 2);
//! assert_eq!(state.last_human_text(), Some("Book a standup"));
//!
//! state.reset();
//! assert!(state.messages.is_empty());
//! assert!(state.user_intent.is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::details::EventDetails;
use crate::message::Message;

/// What the user is trying to accomplish, classified once per user turn.
///
/// The enumeration is closed: the classify-intent node maps every
/// utterance to one of these members, degrading to [`Unknown`](Self::Unknown)
/// when the classifier cannot decide (or fails outright).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIntent {
    /// Small talk or anything conversational without a scheduling action.
    GeneralChat,
    /// Set up a calendar meeting (full detail collection flow).
    ScheduleMeeting,
    /// Cancel an existing meeting.
    CancelMeeting,
    /// Check participant availability.
    CheckAvailability,
    /// Lightweight reminder (topic + time only).
    Reminder,
    /// Could not be classified.
    Unknown,
}

impl UserIntent {
    /// Stable string form, matching the serialized representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UserIntent::GeneralChat => "general_chat",
            UserIntent::ScheduleMeeting => "schedule_meeting",
            UserIntent::CancelMeeting => "cancel_meeting",
            UserIntent::CheckAvailability => "check_availability",
            UserIntent::Reminder => "reminder",
            UserIntent::Unknown => "unknown",
        }
    }

    /// All members, for exhaustive routing checks in tests.
    pub const ALL: [UserIntent; 6] = [
        UserIntent::GeneralChat,
        UserIntent::ScheduleMeeting,
        UserIntent::CancelMeeting,
        UserIntent::CheckAvailability,
        UserIntent::Reminder,
        UserIntent::Unknown,
    ];
}

impl fmt::Display for UserIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable conversation record carried between nodes.
///
/// This is the engine's only unit of shared data: nodes are stateless with
/// respect to each other and communicate exclusively through this container.
///
/// # Fields
///
/// - `messages`: ordered, append-only conversation turns.
/// - `user_intent`: set exactly once per user turn by the classify node,
///   overwritten on the next user turn.
/// - `details`: monotonically-filled event details (see
///   [`EventDetails::merge_from`]).
/// - `pending_prompt`: text the engine still owes the user; produced by the
///   prompt-generation node and consumed by the suspension node.
/// - `operation_name`: label of the side-effecting operation in flight,
///   used when generating retry prompts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub user_intent: Option<UserIntent>,
    #[serde(default)]
    pub details: EventDetails,
    #[serde(default)]
    pub pending_prompt: Option<String>,
    #[serde(default)]
    pub operation_name: Option<String>,
}

impl ConversationState {
    /// Creates an empty state, as on the first message of a session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state seeded with a single human message.
    ///
    /// # Examples
    ///
    /// ```
    /// use confab::state::ConversationState;
    ///
    /// let state = ConversationState::new_with_human_message("hello");
    /// assert_eq!(state.messages.len(), 1);
    /// assert_eq!(state.messages[0].role, "human");
    /// ```
    #[must_use]
    pub fn new_with_human_message(text: &str) -> Self {
        Self {
            messages: vec![Message::human(text)],
            ..Default::default()
        }
    }

    /// Appends a human turn to the message log.
    pub fn push_human(&mut self, text: &str) {
        self.messages.push(Message::human(text));
    }

    /// Appends an assistant turn to the message log.
    pub fn push_assistant(&mut self, text: &str) {
        self.messages.push(Message::assistant(text));
    }

    /// The most recent human turn, if any.
    #[must_use]
    pub fn last_human_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.has_role(Message::HUMAN))
            .map(|m| m.content.as_str())
    }

    /// The most recent assistant turn, if any.
    #[must_use]
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.has_role(Message::ASSISTANT))
            .map(|m| m.content.as_str())
    }

    /// Resets the container to its initial empty shape.
    ///
    /// Performed by the terminal node at the end of every exchange:
    /// messages cleared, intent unset, details all-null, no pending prompt
    /// and no operation in flight.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
