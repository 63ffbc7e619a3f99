//! Conditional routing between workflow nodes.
//!
//! A [`Router`] is a pure, total function from conversation state to one of
//! a declared set of branch labels. Declaring the label space up front is
//! what lets the graph compiler verify that every label a router can emit
//! is mapped to a registered node - an unmapped label is a compile-time
//! error, never a runtime fallback.

use crate::state::{ConversationState, UserIntent};

/// Branch labels emitted by [`IntentRouter`].
pub mod intent_labels {
    pub const GREETING: &str = "greeting";
    pub const COLLECT_INFO: &str = "collect_info";
    pub const CLARIFY: &str = "clarify";
}

/// Branch labels emitted by [`CompletenessRouter`].
pub mod completeness_labels {
    pub const PROCEED: &str = "proceed";
    pub const COLLECT_MORE: &str = "collect_more";
}

/// Branch labels emitted by [`PromptDeliveryRouter`].
pub mod prompt_labels {
    pub const ASK_USER: &str = "ask_user";
    pub const FINISH: &str = "finish";
}

/// A total routing function over conversation state.
///
/// Implementations declare their complete output space via
/// [`labels`](Self::labels) and guarantee that [`route`](Self::route)
/// returns one of those labels for *every* possible state. The graph
/// compiler enforces the mapping side of that contract structurally.
pub trait Router: Send + Sync {
    /// Every label this router can emit.
    fn labels(&self) -> &'static [&'static str];

    /// Select the branch label for the given state.
    fn route(&self, state: &ConversationState) -> &'static str;
}

/// Routes on the classified user intent with a fixed precedence table.
///
/// General chat goes to the greeting branch; scheduling and reminder flows
/// go to detail collection; everything else - including an unset or
/// unrecognized intent, and intents without a dedicated flow - goes to the
/// clarification branch. Never panics, never falls through.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentRouter;

impl IntentRouter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Router for IntentRouter {
    fn labels(&self) -> &'static [&'static str] {
        &[
            intent_labels::GREETING,
            intent_labels::COLLECT_INFO,
            intent_labels::CLARIFY,
        ]
    }

    fn route(&self, state: &ConversationState) -> &'static str {
        match state.user_intent {
            Some(UserIntent::GeneralChat) => intent_labels::GREETING,
            Some(UserIntent::ScheduleMeeting) | Some(UserIntent::Reminder) => {
                intent_labels::COLLECT_INFO
            }
            Some(UserIntent::CancelMeeting)
            | Some(UserIntent::CheckAvailability)
            | Some(UserIntent::Unknown)
            | None => intent_labels::CLARIFY,
        }
    }
}

/// Routes on whether the per-intent required fields are all collected.
///
/// Scheduling requires title, date/time, participants, and duration; the
/// reminder flow requires only title and date/time (see
/// [`required_fields`](crate::details::required_fields)).
#[derive(Debug, Default, Clone, Copy)]
pub struct CompletenessRouter;

impl CompletenessRouter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Router for CompletenessRouter {
    fn labels(&self) -> &'static [&'static str] {
        &[
            completeness_labels::PROCEED,
            completeness_labels::COLLECT_MORE,
        ]
    }

    fn route(&self, state: &ConversationState) -> &'static str {
        let intent = state.user_intent.unwrap_or(UserIntent::Unknown);
        if state.details.is_complete_for(intent) {
            completeness_labels::PROCEED
        } else {
            completeness_labels::COLLECT_MORE
        }
    }
}

/// Routes on whether a prompt is waiting to be delivered to the user.
///
/// After the prompt-generation node runs, a populated `pending_prompt`
/// means the suspension node must ask the user; an absent prompt means
/// nothing is owed and the exchange wraps up.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptDeliveryRouter;

impl PromptDeliveryRouter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Router for PromptDeliveryRouter {
    fn labels(&self) -> &'static [&'static str] {
        &[prompt_labels::ASK_USER, prompt_labels::FINISH]
    }

    fn route(&self, state: &ConversationState) -> &'static str {
        if state.pending_prompt.is_some() {
            prompt_labels::ASK_USER
        } else {
            prompt_labels::FINISH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::EventDetails;

    fn state_with_intent(intent: Option<UserIntent>) -> ConversationState {
        ConversationState {
            user_intent: intent,
            ..Default::default()
        }
    }

    #[test]
    /// The intent router is total: every intent (and no intent) maps to a
    /// declared label.
    fn test_intent_router_is_total() {
        let router = IntentRouter::new();
        let mut inputs: Vec<Option<UserIntent>> =
            UserIntent::ALL.iter().copied().map(Some).collect();
        inputs.push(None);
        for intent in inputs {
            let label = router.route(&state_with_intent(intent));
            assert!(
                router.labels().contains(&label),
                "undeclared label {label} for intent {intent:?}"
            );
        }
    }

    #[test]
    /// Fixed precedence: chat greets, scheduling collects, the rest clarify.
    fn test_intent_router_precedence() {
        let router = IntentRouter::new();
        assert_eq!(
            router.route(&state_with_intent(Some(UserIntent::GeneralChat))),
            intent_labels::GREETING
        );
        assert_eq!(
            router.route(&state_with_intent(Some(UserIntent::ScheduleMeeting))),
            intent_labels::COLLECT_INFO
        );
        assert_eq!(
            router.route(&state_with_intent(Some(UserIntent::Reminder))),
            intent_labels::COLLECT_INFO
        );
        assert_eq!(
            router.route(&state_with_intent(Some(UserIntent::Unknown))),
            intent_labels::CLARIFY
        );
        assert_eq!(
            router.route(&state_with_intent(None)),
            intent_labels::CLARIFY
        );
    }

    #[test]
    /// Completeness routing is total over every (intent, fields) combination
    /// of interest and proceeds only when the required set is filled.
    fn test_completeness_router() {
        let router = CompletenessRouter::new();

        let full = EventDetails {
            title: Some("Standup".into()),
            date_time: Some("tomorrow 9am".into()),
            participants: Some(vec!["Jane".into()]),
            duration: Some(30),
            location: None,
        };
        let reminder_only = EventDetails {
            title: Some("Call Dana".into()),
            date_time: Some("Friday".into()),
            ..Default::default()
        };

        for intent in UserIntent::ALL {
            for details in [
                EventDetails::default(),
                reminder_only.clone(),
                full.clone(),
            ] {
                let state = ConversationState {
                    user_intent: Some(intent),
                    details,
                    ..Default::default()
                };
                let label = router.route(&state);
                assert!(router.labels().contains(&label));
            }
        }

        let complete_schedule = ConversationState {
            user_intent: Some(UserIntent::ScheduleMeeting),
            details: full,
            ..Default::default()
        };
        assert_eq!(
            router.route(&complete_schedule),
            completeness_labels::PROCEED
        );

        let partial_schedule = ConversationState {
            user_intent: Some(UserIntent::ScheduleMeeting),
            details: reminder_only.clone(),
            ..Default::default()
        };
        assert_eq!(
            router.route(&partial_schedule),
            completeness_labels::COLLECT_MORE
        );

        // The same two fields are enough for the lightweight reminder flow.
        let complete_reminder = ConversationState {
            user_intent: Some(UserIntent::Reminder),
            details: reminder_only,
            ..Default::default()
        };
        assert_eq!(
            router.route(&complete_reminder),
            completeness_labels::PROCEED
        );
    }

    #[test]
    /// Prompt delivery branches purely on the pending prompt.
    fn test_prompt_delivery_router() {
        let router = PromptDeliveryRouter::new();
        let mut state = ConversationState::new();
        assert_eq!(router.route(&state), prompt_labels::FINISH);
        state.pending_prompt = Some("what time?".into());
        assert_eq!(router.route(&state), prompt_labels::ASK_USER);
    }
}
