use async_trait::async_trait;
use std::sync::Arc;

use crate::collaborators::DetailExtractor;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::state::{ConversationState, UserIntent};
use crate::types::NodeName;

/// Extracts event details from the latest human turn and accumulates them.
///
/// Extracted fields are merged monotonically into the state's details:
/// previously known values survive unless the new utterance supplies a
/// replacement. Extraction failures keep the known details and fall through
/// to the missing-details prompt. When the per-intent required set becomes
/// complete, a confirmation summary is appended and the completeness router
/// proceeds to the booking node.
pub struct CollectInfoNode {
    extractor: Arc<dyn DetailExtractor>,
}

impl CollectInfoNode {
    #[must_use]
    pub fn new(extractor: Arc<dyn DetailExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Node for CollectInfoNode {
    fn name(&self) -> NodeName {
        NodeName::CollectInfo
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        _ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        let intent = state.user_intent.unwrap_or(UserIntent::Unknown);
        let Some(utterance) = state.last_human_text().map(str::to_string) else {
            return Ok(NodeResult::Continue(state));
        };

        if state.details.is_complete_for(intent) {
            let summary = state.details.completion_message(intent);
            state.push_assistant(&summary);
            return Ok(NodeResult::Continue(state));
        }

        match self.extractor.extract(&utterance, &state.details).await {
            Ok(extracted) => {
                tracing::debug!(?extracted, "merging extracted details");
                state.details.merge_from(extracted);
            }
            Err(error) => {
                tracing::warn!(%error, "detail extraction failed, keeping known details");
            }
        }

        if state.details.is_complete_for(intent) {
            let summary = state.details.completion_message(intent);
            state.push_assistant(&summary);
        }

        Ok(NodeResult::Continue(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::offline::{FailingExtractor, HeuristicDetailExtractor};

    fn scheduling_state(text: &str) -> ConversationState {
        let mut state = ConversationState::new_with_human_message(text);
        state.user_intent = Some(UserIntent::ScheduleMeeting);
        state
    }

    #[tokio::test]
    /// A fully-specified request completes the details in one pass and
    /// appends the confirmation summary.
    async fn test_full_request_completes_details() {
        let node = CollectInfoNode::new(Arc::new(HeuristicDetailExtractor::new()));
        let state = scheduling_state("Schedule a standup with Jane tomorrow 9am for 30 minutes");
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        match result {
            NodeResult::Continue(state) => {
                assert!(state.details.is_complete_for(UserIntent::ScheduleMeeting));
                assert!(state.last_assistant_text().unwrap().contains("standup"));
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// A sparse request leaves the details incomplete without a reply; the
    /// missing-details prompt owns the follow-up question.
    async fn test_sparse_request_stays_incomplete() {
        let node = CollectInfoNode::new(Arc::new(HeuristicDetailExtractor::new()));
        let state = scheduling_state("book a meeting");
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        match result {
            NodeResult::Continue(state) => {
                assert!(!state.details.is_complete_for(UserIntent::ScheduleMeeting));
                assert!(state.last_assistant_text().is_none());
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// Details supplied across turns accumulate instead of replacing.
    async fn test_details_accumulate_across_turns() {
        let node = CollectInfoNode::new(Arc::new(HeuristicDetailExtractor::new()));
        let mut state = scheduling_state("Schedule a standup tomorrow 9am");
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        state = match result {
            NodeResult::Continue(state) => state,
            other => panic!("expected Continue, got {other:?}"),
        };
        assert_eq!(state.details.title.as_deref(), Some("standup"));
        assert!(state.details.participants.is_none());

        state.push_human("with Jane for 30 minutes");
        let result = node.execute(state, NodeContext::new("s", 2)).await.unwrap();
        match result {
            NodeResult::Continue(state) => {
                assert_eq!(state.details.title.as_deref(), Some("standup"));
                assert_eq!(state.details.participants, Some(vec!["Jane".to_string()]));
                assert_eq!(state.details.duration, Some(30));
                assert!(state.details.is_complete_for(UserIntent::ScheduleMeeting));
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// Extraction failure keeps previously known details untouched.
    async fn test_extraction_failure_keeps_details() {
        let node = CollectInfoNode::new(Arc::new(FailingExtractor));
        let mut state = scheduling_state("anything at all");
        state.details.title = Some("Standup".into());
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        match result {
            NodeResult::Continue(state) => {
                assert_eq!(state.details.title.as_deref(), Some("Standup"));
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }
}
