//! Core types for the confab workflow engine.
//!
//! This module defines [`NodeName`], the closed enumeration identifying the
//! steps of the conversational workflow. The graph compiler keys its node
//! registry by `NodeName`, and checkpoints persist the suspended node by
//! its encoded string form.
//!
//! # Examples
//!
//! ```
//! use confab::types::NodeName;
//!
//! let name = NodeName::CollectInfo;
//! assert_eq!(name.encode(), "collect_info");
//! assert_eq!(NodeName::decode("collect_info"), Some(NodeName::CollectInfo));
//!
//! // The enumeration is closed: unknown names do not decode.
//! assert_eq!(NodeName::decode("mystery"), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a node within the workflow graph.
///
/// `NodeName` is a closed enumeration: every step of the workflow is a
/// variant here, and the graph compiler validates that all wiring refers to
/// registered members. Persistence uses [`encode`](Self::encode) /
/// [`decode`](Self::decode); because the set is closed, decoding an unknown
/// string is an error surfaced by the persistence layer rather than a
/// silent fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeName {
    /// Classifies the latest human turn into a [`UserIntent`](crate::state::UserIntent).
    ClassifyIntent,
    /// Replies to general chat.
    Greeting,
    /// Asks the user to restate an unclear request.
    ClarifyRequest,
    /// Extracts and accumulates event details from the conversation.
    CollectInfo,
    /// Generates the question asking for still-missing details.
    PromptMissingDetails,
    /// Suspends to collect the user's answer to the pending question.
    SeekMoreInfo,
    /// Performs the booking call against the calendar collaborator.
    Schedule,
    /// Suspends to ask whether a failed operation should be retried.
    RetryApproval,
    /// Terminal node: resets the conversation state.
    End,
}

impl NodeName {
    /// All workflow nodes, in graph order.
    pub const ALL: [NodeName; 9] = [
        NodeName::ClassifyIntent,
        NodeName::Greeting,
        NodeName::ClarifyRequest,
        NodeName::CollectInfo,
        NodeName::PromptMissingDetails,
        NodeName::SeekMoreInfo,
        NodeName::Schedule,
        NodeName::RetryApproval,
        NodeName::End,
    ];

    /// Encode a `NodeName` into its persisted string form.
    #[must_use]
    pub fn encode(&self) -> &'static str {
        match self {
            NodeName::ClassifyIntent => "classify_intent",
            NodeName::Greeting => "greeting",
            NodeName::ClarifyRequest => "clarify_request",
            NodeName::CollectInfo => "collect_info",
            NodeName::PromptMissingDetails => "prompt_missing_details",
            NodeName::SeekMoreInfo => "seek_more_info",
            NodeName::Schedule => "schedule",
            NodeName::RetryApproval => "retry_approval",
            NodeName::End => "end",
        }
    }

    /// Decode a persisted string form back into a `NodeName`.
    ///
    /// Returns `None` for names outside the closed set; callers decide
    /// whether that is a hard error (the persistence layer treats it as
    /// one).
    #[must_use]
    pub fn decode(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|n| n.encode() == s)
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}
