use async_trait::async_trait;

use crate::interrupt::Interrupt;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::state::ConversationState;
use crate::types::NodeName;

const RETRY_QUESTION: &str = "Would you like to retry this operation?";

const RETRY_MESSAGE: &str = "Got it - retrying that operation now.";

const CANCEL_MESSAGE: &str =
    "I understand. I apologize for the technical issue with our calendar \
     system. The request has been canceled - please feel free to try again \
     later, or let me know if there's anything else I can help you with.";

/// Suspends to ask whether a failed operation should be retried.
///
/// Raises an `operation_approval` interrupt with exactly the options
/// `retry` and `cancel`. On resume, an answer case-insensitively equal to
/// `retry` jumps back to the booking node; any other answer is treated as
/// cancel and jumps to the terminal node. The everything-else-cancels
/// default is deliberate and covered by tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RetryApprovalNode;

impl RetryApprovalNode {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn suspend(state: ConversationState) -> NodeResult {
        let message = match state.operation_name.as_deref() {
            Some(operation) => format!("The {operation} operation failed."),
            None => "The last operation failed.".to_string(),
        };
        NodeResult::Suspend(state, Interrupt::operation_approval(message, RETRY_QUESTION))
    }
}

#[async_trait]
impl Node for RetryApprovalNode {
    fn name(&self) -> NodeName {
        NodeName::RetryApproval
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        match ctx.resume_input {
            None => Ok(Self::suspend(state)),
            Some(answer) => {
                if answer.trim().eq_ignore_ascii_case("retry") {
                    tracing::info!("user chose to retry the operation");
                    state.push_assistant(RETRY_MESSAGE);
                    Ok(NodeResult::Goto(state, NodeName::Schedule))
                } else {
                    tracing::info!(answer = %answer, "user declined retry, canceling");
                    state.push_assistant(CANCEL_MESSAGE);
                    Ok(NodeResult::Goto(state, NodeName::End))
                }
            }
        }
    }
}
