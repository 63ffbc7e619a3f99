use async_trait::async_trait;

use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::state::ConversationState;
use crate::types::NodeName;

/// Terminal node: closes out the exchange.
///
/// Resets the conversation state to its empty shape so the next user
/// message starts a fresh walk on the same session. The node has no
/// outgoing edge; after it continues, the engine observes no successor and
/// transitions the session to Terminated.
#[derive(Debug, Default, Clone, Copy)]
pub struct EndNode;

impl EndNode {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Node for EndNode {
    fn name(&self) -> NodeName {
        NodeName::End
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        _ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        state.reset();
        Ok(NodeResult::Continue(state))
    }
}
