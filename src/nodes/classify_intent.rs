use async_trait::async_trait;
use std::sync::Arc;

use crate::collaborators::IntentClassifier;
use crate::message::Message;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::state::{ConversationState, UserIntent};
use crate::types::NodeName;

/// Classifies the latest human turn and records the intent on the state.
///
/// Runs at the entry of every walk, so `user_intent` is set exactly once
/// per user turn and overwritten on the next one. A classifier failure
/// degrades to [`UserIntent::Unknown`]; it never escapes this node.
pub struct ClassifyIntentNode {
    classifier: Arc<dyn IntentClassifier>,
}

impl ClassifyIntentNode {
    #[must_use]
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Node for ClassifyIntentNode {
    fn name(&self) -> NodeName {
        NodeName::ClassifyIntent
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        _ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        let last = state.messages.last().ok_or(NodeError::MissingInput {
            what: "a human message to classify",
        })?;

        if last.has_role(Message::HUMAN) {
            let text = last.content.clone();
            let intent = match self.classifier.classify(&text).await {
                Ok(intent) => intent,
                Err(error) => {
                    tracing::warn!(%error, "intent classification failed, defaulting to unknown");
                    UserIntent::Unknown
                }
            };
            tracing::debug!(intent = %intent, "classified user turn");
            state.user_intent = Some(intent);
        }

        Ok(NodeResult::Continue(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::offline::{FailingClassifier, KeywordIntentClassifier};

    #[tokio::test]
    /// A scheduling utterance sets the scheduling intent.
    async fn test_classifies_scheduling_turn() {
        let node = ClassifyIntentNode::new(Arc::new(KeywordIntentClassifier::new()));
        let state = ConversationState::new_with_human_message("book a meeting");
        let result = node
            .execute(state, NodeContext::new("s", 1))
            .await
            .unwrap();
        match result {
            NodeResult::Continue(state) => {
                assert_eq!(state.user_intent, Some(UserIntent::ScheduleMeeting));
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// Classifier failures degrade to Unknown instead of propagating.
    async fn test_classifier_failure_degrades_to_unknown() {
        let node = ClassifyIntentNode::new(Arc::new(FailingClassifier));
        let state = ConversationState::new_with_human_message("book a meeting");
        let result = node
            .execute(state, NodeContext::new("s", 1))
            .await
            .unwrap();
        match result {
            NodeResult::Continue(state) => {
                assert_eq!(state.user_intent, Some(UserIntent::Unknown));
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// An empty conversation is an engine fault, not a silent pass.
    async fn test_empty_conversation_is_missing_input() {
        let node = ClassifyIntentNode::new(Arc::new(KeywordIntentClassifier::new()));
        let result = node
            .execute(ConversationState::new(), NodeContext::new("s", 1))
            .await;
        assert!(matches!(result, Err(NodeError::MissingInput { .. })));
    }
}
