//! Node execution framework for the confab workflow engine.
//!
//! This module provides the core abstractions for executable workflow
//! nodes: the [`Node`] trait, the per-invocation [`NodeContext`], the
//! [`NodeResult`] control-flow outcome, and fatal [`NodeError`]s.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::interrupt::Interrupt;
use crate::state::ConversationState;
use crate::types::NodeName;

// ============================================================================
// Core Trait
// ============================================================================

/// Core trait defining executable workflow nodes.
///
/// A node is a named unit of work: given the current [`ConversationState`]
/// it produces an updated state plus a control-flow decision, expressed as
/// a [`NodeResult`].
///
/// # Design Principles
///
/// - **Deterministic**: given the same state (and collaborator behavior), a
///   node produces the same result.
/// - **Self-contained failure handling**: collaborator failures (LLM,
///   calendar API) are caught inside the node and converted into a
///   `Continue`/`Goto` carrying a user-facing message. Returning
///   `Err(NodeError)` is reserved for engine faults that should halt the
///   session.
/// - **Stateless**: nodes share data only through the state container.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use confab::node::{Node, NodeContext, NodeError, NodeResult};
/// use confab::state::ConversationState;
/// use confab::types::NodeName;
///
/// struct EchoNode;
///
/// #[async_trait]
/// impl Node for EchoNode {
///     fn name(&self) -> NodeName {
///         NodeName::Greeting
///     }
///
///     async fn execute(
///         &self,
///         mut state: ConversationState,
///         _ctx: NodeContext,
///     ) -> Result<NodeResult, NodeError> {
///         let text = state.last_human_text().unwrap_or("hello").to_string();
///         state.push_assistant(&text);
///         Ok(NodeResult::Continue(state))
///     }
/// }
/// ```
#[async_trait]
pub trait Node: Send + Sync {
    /// The unique name this node is registered and logged under.
    fn name(&self) -> NodeName;

    /// Execute this node against the current conversation state.
    async fn execute(
        &self,
        state: ConversationState,
        ctx: NodeContext,
    ) -> Result<NodeResult, NodeError>;
}

// ============================================================================
// Execution Context
// ============================================================================

/// Execution context passed to nodes by the engine.
///
/// Carries the session identity (also used as the credential reference for
/// booking collaborators), the step counter within the current walk, and -
/// only on the first node invocation of a resume call - the external answer
/// being fed back to the suspended node.
#[derive(Clone, Debug)]
pub struct NodeContext {
    /// Identifier of the session this walk belongs to.
    pub session_id: String,
    /// Step number within the current walk.
    pub step: u64,
    /// Answer supplied by the caller when resuming a suspended node.
    ///
    /// `None` on every ordinary invocation. A suspending node decides what
    /// to do with the value; an absent or empty answer typically means the
    /// node suspends again.
    pub resume_input: Option<String>,
}

impl NodeContext {
    /// Context for an ordinary (non-resume) invocation.
    #[must_use]
    pub fn new(session_id: impl Into<String>, step: u64) -> Self {
        Self {
            session_id: session_id.into(),
            step,
            resume_input: None,
        }
    }

    /// Context carrying a resume answer for a suspended node.
    #[must_use]
    pub fn resuming(session_id: impl Into<String>, step: u64, answer: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            step,
            resume_input: Some(answer.into()),
        }
    }
}

// ============================================================================
// Control Flow
// ============================================================================

/// The outcome of a node invocation.
///
/// Every variant carries the updated state; the variant itself is the
/// control-flow decision the engine applies:
///
/// - `Continue`: advance along the node's outgoing edge (static or
///   conditional via a router); no outgoing edge means the walk terminates.
/// - `Goto`: jump directly to the named node, bypassing edge lookup. Used
///   for success/failure short-circuits (e.g. a failed booking jumping
///   straight to the retry-approval node). Jump targets must be declared to
///   the graph builder so compilation can validate them.
/// - `Suspend`: halt the walk, persist the state and interrupt, and return
///   the question to the caller. The same node is re-invoked on resume.
#[derive(Clone, Debug)]
pub enum NodeResult {
    Continue(ConversationState),
    Goto(ConversationState, NodeName),
    Suspend(ConversationState, Interrupt),
}

// ============================================================================
// Error Types
// ============================================================================

/// Fatal errors surfaced by node execution.
///
/// These halt the session walk. Recoverable conditions (collaborator
/// timeouts, parse failures) must instead be converted by the node into a
/// user-facing message on the returned state.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    /// Expected input data is missing from the conversation state.
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(confab::node::missing_input),
        help("Check that the engine or a previous node produced the required data.")
    )]
    MissingInput { what: &'static str },

    /// JSON serialization/deserialization error.
    #[error(transparent)]
    #[diagnostic(code(confab::node::serde_json))]
    Serde(#[from] serde_json::Error),

    /// Internal invariant violated inside a node.
    #[error("node {node} internal error: {message}")]
    #[diagnostic(code(confab::node::internal))]
    Internal { node: NodeName, message: String },
}
