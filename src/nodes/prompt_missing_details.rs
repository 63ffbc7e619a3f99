use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::collaborators::TextGenerator;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::prompts::PromptTemplate;
use crate::state::{ConversationState, UserIntent};
use crate::types::NodeName;

/// Generates the question asking for still-missing required fields.
///
/// The question lands in `pending_prompt`; the seek-more-info node consumes
/// it when suspending. If the details are somehow already complete this
/// node leaves the prompt unset, which routes the walk to the terminal node
/// instead of suspending on an empty question.
pub struct PromptMissingDetailsNode {
    generator: Arc<dyn TextGenerator>,
}

impl PromptMissingDetailsNode {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Node for PromptMissingDetailsNode {
    fn name(&self) -> NodeName {
        NodeName::PromptMissingDetails
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        _ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        let intent = state.user_intent.unwrap_or(UserIntent::Unknown);
        let missing = state.details.missing_for(intent);

        if missing.is_empty() {
            // Graph anomaly: the completeness router should not have sent a
            // complete record here.
            tracing::error!(node = %self.name(), "details already complete, nothing to ask");
            return Ok(NodeResult::Continue(state));
        }

        let missing_list = missing
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut vars = FxHashMap::default();
        vars.insert("missing_fields".to_string(), missing_list.clone());

        let question = match self
            .generator
            .generate(PromptTemplate::MissingFields, &vars)
            .await
        {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "missing-fields generation failed, using fallback");
                format!(
                    "I need some more information, could you provide all the \
                     details? I need the following information: {missing_list}"
                )
            }
        };
        state.pending_prompt = Some(question);
        Ok(NodeResult::Continue(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::offline::{FailingGenerator, TemplateTextGenerator};

    #[tokio::test]
    /// The generated question names every missing field.
    async fn test_question_names_missing_fields() {
        let node = PromptMissingDetailsNode::new(Arc::new(TemplateTextGenerator::new()));
        let mut state = ConversationState::new_with_human_message("book a meeting");
        state.user_intent = Some(UserIntent::ScheduleMeeting);
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        match result {
            NodeResult::Continue(state) => {
                let question = state.pending_prompt.expect("prompt set");
                for field in ["title", "date_time", "participants", "duration"] {
                    assert!(question.contains(field), "question missing {field}");
                }
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// Generator failure falls back to a deterministic question that still
    /// lists the missing fields.
    async fn test_generator_failure_uses_fallback() {
        let node = PromptMissingDetailsNode::new(Arc::new(FailingGenerator));
        let mut state = ConversationState::new_with_human_message("book a meeting");
        state.user_intent = Some(UserIntent::ScheduleMeeting);
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        match result {
            NodeResult::Continue(state) => {
                let question = state.pending_prompt.expect("prompt set");
                assert!(question.contains("title"));
                assert!(question.contains("duration"));
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// Complete details leave the prompt unset (routes to the terminal node).
    async fn test_complete_details_skip_prompt() {
        let node = PromptMissingDetailsNode::new(Arc::new(TemplateTextGenerator::new()));
        let mut state = ConversationState::new_with_human_message("remind me");
        state.user_intent = Some(UserIntent::Reminder);
        state.details.title = Some("Call Dana".into());
        state.details.date_time = Some("Friday".into());
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        match result {
            NodeResult::Continue(state) => assert!(state.pending_prompt.is_none()),
            other => panic!("expected Continue, got {other:?}"),
        }
    }
}
