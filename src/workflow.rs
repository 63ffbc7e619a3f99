//! Assembly of the scheduling-assistant workflow graph.
//!
//! Construction is explicit dependency injection: callers build a
//! [`Collaborators`] bundle (offline heuristics, LLM-backed services,
//! whatever fits), hand it to [`build_workflow`], and receive a compiled
//! [`Graph`]. There is no global graph factory and nothing is lazily
//! initialized.

use std::sync::Arc;

use crate::collaborators::offline::{
    HeuristicDetailExtractor, KeywordIntentClassifier, OfflineCalendar, TemplateTextGenerator,
};
use crate::collaborators::{Calendar, DetailExtractor, IntentClassifier, TextGenerator};
use crate::graphs::{Graph, GraphBuilder, GraphCompileError};
use crate::nodes::{
    ClarifyRequestNode, ClassifyIntentNode, CollectInfoNode, EndNode, GreetingNode,
    PromptMissingDetailsNode, RetryApprovalNode, ScheduleNode, SeekMoreInfoNode,
};
use crate::routing::{
    CompletenessRouter, IntentRouter, PromptDeliveryRouter, completeness_labels, intent_labels,
    prompt_labels,
};
use crate::types::NodeName;

/// The external collaborators the workflow nodes depend on.
#[derive(Clone)]
pub struct Collaborators {
    pub classifier: Arc<dyn IntentClassifier>,
    pub generator: Arc<dyn TextGenerator>,
    pub extractor: Arc<dyn DetailExtractor>,
    pub calendar: Arc<dyn Calendar>,
}

impl Collaborators {
    /// The deterministic, network-free bundle.
    ///
    /// Suitable for tests and for running the engine hermetically; swap
    /// individual fields for model- or API-backed implementations.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            classifier: Arc::new(KeywordIntentClassifier::new()),
            generator: Arc::new(TemplateTextGenerator::new()),
            extractor: Arc::new(HeuristicDetailExtractor::new()),
            calendar: Arc::new(OfflineCalendar::new()),
        }
    }
}

/// Builds and compiles the scheduling-assistant workflow.
///
/// Topology:
///
/// ```text
/// classify_intent ──(intent router)──> greeting ────────────> end
///                                  ├─> clarify_request ─────> end
///                                  └─> collect_info
/// collect_info ──(completeness)──> schedule | prompt_missing_details
/// prompt_missing_details ──(prompt delivery)──> seek_more_info | end
/// seek_more_info ─────────────────> collect_info
/// schedule ──goto──> end | retry_approval
/// retry_approval ──goto──> schedule | end
/// ```
pub fn build_workflow(collaborators: &Collaborators) -> Result<Graph, GraphCompileError> {
    GraphBuilder::new()
        .add_node(ClassifyIntentNode::new(collaborators.classifier.clone()))
        .add_node(GreetingNode::new(collaborators.generator.clone()))
        .add_node(ClarifyRequestNode::new(collaborators.generator.clone()))
        .add_node(CollectInfoNode::new(collaborators.extractor.clone()))
        .add_node(PromptMissingDetailsNode::new(collaborators.generator.clone()))
        .add_node(SeekMoreInfoNode::new())
        .add_node(ScheduleNode::new(collaborators.calendar.clone()))
        .add_node(RetryApprovalNode::new())
        .add_node(EndNode::new())
        .set_entry(NodeName::ClassifyIntent)
        .add_conditional_edges(
            NodeName::ClassifyIntent,
            IntentRouter::new(),
            [
                (intent_labels::GREETING, NodeName::Greeting),
                (intent_labels::COLLECT_INFO, NodeName::CollectInfo),
                (intent_labels::CLARIFY, NodeName::ClarifyRequest),
            ],
        )
        .add_conditional_edges(
            NodeName::CollectInfo,
            CompletenessRouter::new(),
            [
                (completeness_labels::PROCEED, NodeName::Schedule),
                (
                    completeness_labels::COLLECT_MORE,
                    NodeName::PromptMissingDetails,
                ),
            ],
        )
        .add_conditional_edges(
            NodeName::PromptMissingDetails,
            PromptDeliveryRouter::new(),
            [
                (prompt_labels::ASK_USER, NodeName::SeekMoreInfo),
                (prompt_labels::FINISH, NodeName::End),
            ],
        )
        .add_edge(NodeName::SeekMoreInfo, NodeName::CollectInfo)
        .add_edge(NodeName::Greeting, NodeName::End)
        .add_edge(NodeName::ClarifyRequest, NodeName::End)
        .add_goto_edge(NodeName::Schedule, NodeName::End)
        .add_goto_edge(NodeName::Schedule, NodeName::RetryApproval)
        .add_goto_edge(NodeName::RetryApproval, NodeName::Schedule)
        .add_goto_edge(NodeName::RetryApproval, NodeName::End)
        .compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// The canonical workflow compiles with every node reachable.
    fn test_workflow_compiles() {
        let graph = build_workflow(&Collaborators::offline()).expect("workflow compiles");
        assert_eq!(graph.entry(), NodeName::ClassifyIntent);
        assert_eq!(graph.node_names().len(), 9);
        assert!(graph.is_declared_jump(NodeName::Schedule, NodeName::RetryApproval));
        assert!(graph.is_declared_jump(NodeName::RetryApproval, NodeName::Schedule));
    }
}
