use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::collaborators::TextGenerator;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::prompts::PromptTemplate;
use crate::state::ConversationState;
use crate::types::NodeName;

const CLARIFY_FALLBACK: &str =
    "I'm not sure I understood that. Could you tell me what you'd like me to \
     do - for example, schedule a meeting or set a reminder?";

/// Asks the user to restate a request the classifier could not place.
///
/// This is the branch the intent router picks for unset or unrecognized
/// intents, so the node must always produce a reply.
pub struct ClarifyRequestNode {
    generator: Arc<dyn TextGenerator>,
}

impl ClarifyRequestNode {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Node for ClarifyRequestNode {
    fn name(&self) -> NodeName {
        NodeName::ClarifyRequest
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        _ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        let mut vars = FxHashMap::default();
        if let Some(user_message) = state.last_human_text() {
            vars.insert("user_message".to_string(), user_message.to_string());
        }
        let reply = match self
            .generator
            .generate(PromptTemplate::ClarifyRequest, &vars)
            .await
        {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(%error, "clarification generation failed, using fallback");
                CLARIFY_FALLBACK.to_string()
            }
        };
        state.push_assistant(&reply);
        Ok(NodeResult::Continue(state))
    }
}
