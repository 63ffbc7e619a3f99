use async_trait::async_trait;

use crate::interrupt::Interrupt;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::state::ConversationState;
use crate::types::NodeName;

const INTERRUPT_MESSAGE: &str = "Need more information to continue";

/// Question used if the walk reaches this node without a pending prompt.
const DEFAULT_QUESTION: &str = "Could you share the remaining details for your request?";

/// Suspends the walk to collect the user's answer to the pending question.
///
/// On the first invocation the node raises a `seek_more_info` interrupt
/// carrying the question produced by the prompt-generation node. On resume
/// the answer is appended verbatim as a human turn, the pending prompt is
/// cleared, and execution continues along the static edge back to the
/// collect-info node. An empty answer suspends again with the same
/// question: re-asking is an explicit result, not exception control flow.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeekMoreInfoNode;

impl SeekMoreInfoNode {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn suspend(state: ConversationState) -> NodeResult {
        let question = state
            .pending_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_QUESTION.to_string());
        NodeResult::Suspend(state, Interrupt::seek_more_info(INTERRUPT_MESSAGE, question))
    }
}

#[async_trait]
impl Node for SeekMoreInfoNode {
    fn name(&self) -> NodeName {
        NodeName::SeekMoreInfo
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        match ctx.resume_input {
            None => Ok(Self::suspend(state)),
            Some(answer) if answer.trim().is_empty() => {
                tracing::info!("empty answer to information request, asking again");
                Ok(Self::suspend(state))
            }
            Some(answer) => {
                state.push_human(&answer);
                state.pending_prompt = None;
                Ok(NodeResult::Continue(state))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::InterruptKind;

    fn state_with_prompt(question: &str) -> ConversationState {
        let mut state = ConversationState::new_with_human_message("book a meeting");
        state.pending_prompt = Some(question.to_string());
        state
    }

    #[tokio::test]
    /// The first invocation suspends with the pending question.
    async fn test_suspends_with_pending_question() {
        let node = SeekMoreInfoNode::new();
        let state = state_with_prompt("What time should the meeting start?");
        let result = node.execute(state, NodeContext::new("s", 1)).await.unwrap();
        match result {
            NodeResult::Suspend(state, interrupt) => {
                assert_eq!(interrupt.kind, InterruptKind::SeekMoreInfo);
                assert_eq!(interrupt.question, "What time should the meeting start?");
                assert!(interrupt.options.is_empty());
                // The prompt is only cleared once the answer arrives.
                assert!(state.pending_prompt.is_some());
            }
            other => panic!("expected Suspend, got {other:?}"),
        }
    }

    #[tokio::test]
    /// A resume answer is appended verbatim and clears the pending prompt.
    async fn test_resume_appends_answer() {
        let node = SeekMoreInfoNode::new();
        let state = state_with_prompt("What time?");
        let ctx = NodeContext::resuming("s", 2, "tomorrow at 9am");
        let result = node.execute(state, ctx).await.unwrap();
        match result {
            NodeResult::Continue(state) => {
                assert_eq!(state.last_human_text(), Some("tomorrow at 9am"));
                assert!(state.pending_prompt.is_none());
            }
            other => panic!("expected Continue, got {other:?}"),
        }
    }

    #[tokio::test]
    /// An empty answer suspends again with the same question.
    async fn test_empty_answer_asks_again() {
        let node = SeekMoreInfoNode::new();
        let state = state_with_prompt("What time?");
        let ctx = NodeContext::resuming("s", 2, "   ");
        let result = node.execute(state, ctx).await.unwrap();
        match result {
            NodeResult::Suspend(_, interrupt) => {
                assert_eq!(interrupt.question, "What time?");
            }
            other => panic!("expected Suspend, got {other:?}"),
        }
    }
}
