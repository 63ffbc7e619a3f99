use async_trait::async_trait;
use std::sync::Arc;

use crate::collaborators::{BookingConfirmation, Calendar};
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::state::{ConversationState, UserIntent};
use crate::types::NodeName;

/// Operation label recorded while a booking is in flight; surfaces in the
/// retry prompt when the booking fails.
const OPERATION_NAME: &str = "schedule_event";

/// Performs the booking call against the calendar collaborator.
///
/// Success appends a confirmation message and jumps straight to the
/// terminal node; any failure - auth, quota, outage - is treated uniformly:
/// the error is surfaced as an assistant message and the walk jumps to the
/// retry-approval node. Both paths bypass the router via `Goto`.
pub struct ScheduleNode {
    calendar: Arc<dyn Calendar>,
}

impl ScheduleNode {
    #[must_use]
    pub fn new(calendar: Arc<dyn Calendar>) -> Self {
        Self { calendar }
    }

    fn success_message(state: &ConversationState, confirmation: &BookingConfirmation) -> String {
        let title = state.details.title.as_deref().unwrap_or("Meeting");
        let mut message = format!(
            "Meeting scheduled successfully!\n\
             Event ID: {}\n\
             Title: {}\n\
             Time: {} - {}",
            confirmation.event_id, title, confirmation.start_time, confirmation.end_time
        );
        if let Some(link) = &confirmation.event_link {
            message.push_str(&format!("\nCalendar link: {link}"));
        }
        if let Some(participants) = state.details.participants.as_ref().filter(|p| !p.is_empty()) {
            message.push_str(&format!("\nParticipants: {}", participants.join(", ")));
        }
        message
    }
}

#[async_trait]
impl Node for ScheduleNode {
    fn name(&self) -> NodeName {
        NodeName::Schedule
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        if state.user_intent != Some(UserIntent::ScheduleMeeting) {
            tracing::warn!(
                intent = ?state.user_intent,
                "no scheduling action needed for this intent"
            );
            state.push_assistant("No scheduling action needed for this intent.");
            return Ok(NodeResult::Goto(state, NodeName::End));
        }

        state.operation_name = Some(OPERATION_NAME.to_string());

        match self.calendar.book(&ctx.session_id, &state.details).await {
            Ok(confirmation) => {
                tracing::info!(event_id = %confirmation.event_id, "meeting scheduled");
                let message = Self::success_message(&state, &confirmation);
                state.push_assistant(&message);
                state.operation_name = None;
                Ok(NodeResult::Goto(state, NodeName::End))
            }
            Err(error) => {
                tracing::error!(%error, "scheduling failed");
                state.push_assistant(&format!("Failed to schedule the meeting: {error}"));
                Ok(NodeResult::Goto(state, NodeName::RetryApproval))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::offline::{FailingCalendar, OfflineCalendar};
    use crate::details::EventDetails;

    fn ready_state() -> ConversationState {
        let mut state = ConversationState::new_with_human_message("schedule it");
        state.user_intent = Some(UserIntent::ScheduleMeeting);
        state.details = EventDetails {
            title: Some("Standup".into()),
            date_time: Some("2025-05-01 10:00".into()),
            participants: Some(vec!["jane@example.com".into()]),
            duration: Some(30),
            location: None,
        };
        state
    }

    #[tokio::test]
    /// A successful booking appends the confirmation and jumps to End.
    async fn test_success_jumps_to_end() {
        let node = ScheduleNode::new(Arc::new(OfflineCalendar::new()));
        let result = node
            .execute(ready_state(), NodeContext::new("session-1", 1))
            .await
            .unwrap();
        match result {
            NodeResult::Goto(state, target) => {
                assert_eq!(target, NodeName::End);
                let reply = state.last_assistant_text().unwrap();
                assert!(reply.contains("scheduled successfully"));
                assert!(reply.contains("Standup"));
                assert!(state.operation_name.is_none());
            }
            other => panic!("expected Goto, got {other:?}"),
        }
    }

    #[tokio::test]
    /// Any booking failure jumps to the retry-approval node with the
    /// operation recorded.
    async fn test_failure_jumps_to_retry_approval() {
        let node = ScheduleNode::new(Arc::new(FailingCalendar::new("quota exceeded")));
        let result = node
            .execute(ready_state(), NodeContext::new("session-1", 1))
            .await
            .unwrap();
        match result {
            NodeResult::Goto(state, target) => {
                assert_eq!(target, NodeName::RetryApproval);
                assert!(state.last_assistant_text().unwrap().contains("Failed to schedule"));
                assert_eq!(state.operation_name.as_deref(), Some(OPERATION_NAME));
            }
            other => panic!("expected Goto, got {other:?}"),
        }
    }

    #[tokio::test]
    /// A non-scheduling intent short-circuits to End without booking.
    async fn test_wrong_intent_short_circuits() {
        let node = ScheduleNode::new(Arc::new(FailingCalendar::new("must not be called")));
        let mut state = ready_state();
        state.user_intent = Some(UserIntent::GeneralChat);
        let result = node
            .execute(state, NodeContext::new("session-1", 1))
            .await
            .unwrap();
        match result {
            NodeResult::Goto(state, target) => {
                assert_eq!(target, NodeName::End);
                assert!(
                    state
                        .last_assistant_text()
                        .unwrap()
                        .contains("No scheduling action needed")
                );
            }
            other => panic!("expected Goto, got {other:?}"),
        }
    }
}
