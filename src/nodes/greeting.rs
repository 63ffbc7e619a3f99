use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::collaborators::TextGenerator;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::prompts::PromptTemplate;
use crate::state::ConversationState;
use crate::types::NodeName;

/// Deterministic reply used when the text generator is unavailable.
const GREETING_FALLBACK: &str =
    "Hello! I can schedule meetings, set reminders, and check availability. \
     What can I do for you?";

/// Replies to general chat via the text-generation collaborator.
pub struct GreetingNode {
    generator: Arc<dyn TextGenerator>,
}

impl GreetingNode {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Node for GreetingNode {
    fn name(&self) -> NodeName {
        NodeName::Greeting
    }

    async fn execute(
        &self,
        mut state: ConversationState,
        _ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        if let Some(user_message) = state.last_human_text().map(str::to_string) {
            let mut vars = FxHashMap::default();
            vars.insert("user_message".to_string(), user_message);
            let reply = match self
                .generator
                .generate(PromptTemplate::Greeting, &vars)
                .await
            {
                Ok(text) => text,
                Err(error) => {
                    tracing::warn!(%error, "greeting generation failed, using fallback");
                    GREETING_FALLBACK.to_string()
                }
            };
            state.push_assistant(&reply);
        }
        Ok(NodeResult::Continue(state))
    }
}
