//! The execution engine: the step loop, the suspend/resume protocol, and
//! the caller-facing `submit`/`resume` API.
//!
//! The engine is a state machine over {Running, Suspended, Terminated} for
//! each session. A walk starts at the graph's entry node and repeatedly
//! invokes the current node, applying its [`NodeResult`]:
//!
//! - `Continue` consults the node's outgoing edge (static, or conditional
//!   via a router); no outgoing edge transitions the session to
//!   Terminated.
//! - `Goto` jumps directly to the named node, bypassing edge lookup (the
//!   jump must have been declared to the graph builder).
//! - `Suspend` persists the state and interrupt through the checkpoint
//!   store, transitions the session to Suspended, and returns the
//!   interrupt to the caller. Nothing else in the loop yields control.
//!
//! Sessions are fully independent: isolation is structural (distinct
//! checkpoint keys), and a suspended session holds no engine-side
//! resources - the persisted checkpoint is the only artifact. Serializing
//! concurrent calls for a single session is the integration's
//! responsibility.

use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

use crate::graphs::{Graph, RouteMismatch};
use crate::interrupt::Interrupt;
use crate::node::{Node, NodeContext, NodeError, NodeResult};
use crate::state::ConversationState;
use crate::types::NodeName;

use super::checkpointer::{
    Checkpoint, Checkpointer, CheckpointerError, CheckpointerType, EngineStatus,
    InMemoryCheckpointer,
};
use super::runtime_config::RuntimeConfig;

/// Reply used when a terminated walk somehow produced no assistant turn.
const FALLBACK_REPLY: &str = "I'm having trouble processing your request. Please try again.";

/// Result of one `submit` or `resume` call.
///
/// Exactly one of `assistant_text` / `interrupt` is populated: a suspended
/// walk owes the caller a question, a finished walk owes them a reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineResponse {
    pub assistant_text: Option<String>,
    pub interrupt: Option<Interrupt>,
    pub status: EngineStatus,
}

/// Errors surfaced by the engine's caller-facing API.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    /// `submit` was called while the session owes an answer.
    #[error("session {session_id} is suspended and awaiting a resume")]
    #[diagnostic(
        code(confab::engine::awaiting_resume),
        help("Answer the pending interrupt with resume() before submitting new messages.")
    )]
    AwaitingResume { session_id: String },

    /// `resume` was called on a session that is not suspended.
    #[error("session {session_id} is not suspended")]
    #[diagnostic(
        code(confab::engine::not_suspended),
        help("Only a session with a pending interrupt can be resumed; state was left untouched.")
    )]
    NotSuspended { session_id: String },

    /// The walk reached a node name with no registered implementation.
    #[error("node {node} is not registered in the compiled graph")]
    #[diagnostic(code(confab::engine::unknown_node))]
    UnknownNode { node: NodeName },

    /// A conditional edge produced an unmapped label at runtime.
    #[error(transparent)]
    #[diagnostic(code(confab::engine::unmapped_route))]
    UnmappedRoute(#[from] RouteMismatch),

    /// A node jumped to a target it never declared.
    #[error("undeclared goto jump from {from} to {to}")]
    #[diagnostic(
        code(confab::engine::undeclared_jump),
        help("Declare the jump with GraphBuilder::add_goto_edge so compilation can validate it.")
    )]
    UndeclaredJump { from: NodeName, to: NodeName },

    /// The walk exceeded the configured step limit.
    #[error("session {session_id} exceeded the step limit of {limit}")]
    #[diagnostic(
        code(confab::engine::step_limit),
        help("A correctly wired graph terminates or suspends well under the limit; check for routing loops.")
    )]
    StepLimitExceeded { session_id: String, limit: u64 },

    /// Checkpoint store failure; nothing was persisted for this call.
    #[error(transparent)]
    #[diagnostic(code(confab::engine::checkpoint))]
    Checkpoint(#[from] CheckpointerError),

    /// A node raised a fatal (engine-level) error.
    #[error(transparent)]
    #[diagnostic(code(confab::engine::node))]
    Node(#[from] NodeError),
}

/// Runtime execution engine for a compiled workflow graph.
///
/// One engine serves any number of sessions; per-session state lives
/// entirely in the checkpoint store. Construct it explicitly - via
/// [`new`](Self::new) with an injected store, or
/// [`from_config`](Self::from_config) - and share it as needed.
///
/// # Examples
///
/// ```no_run
/// use confab::collaborators::offline::{
///     HeuristicDetailExtractor, KeywordIntentClassifier, OfflineCalendar,
///     TemplateTextGenerator,
/// };
/// use confab::runtimes::{Engine, InMemoryCheckpointer};
/// use confab::workflow::{Collaborators, build_workflow};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let collaborators = Collaborators {
///     classifier: Arc::new(KeywordIntentClassifier::new()),
///     generator: Arc::new(TemplateTextGenerator::new()),
///     extractor: Arc::new(HeuristicDetailExtractor::new()),
///     calendar: Arc::new(OfflineCalendar::new()),
/// };
/// let graph = build_workflow(&collaborators)?;
/// let engine = Engine::new(graph, Arc::new(InMemoryCheckpointer::new()));
///
/// let response = engine.submit("session-1", "book a meeting").await?;
/// if let Some(interrupt) = response.interrupt {
///     let answer = "Standup with Jane tomorrow 9am for 30 minutes";
///     let followup = engine.resume("session-1", answer).await?;
///     println!("{:?}", followup.assistant_text);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    graph: Graph,
    checkpointer: Arc<dyn Checkpointer>,
    step_limit: u64,
}

impl Engine {
    /// Creates an engine over `graph` with an explicitly injected store.
    #[must_use]
    pub fn new(graph: Graph, checkpointer: Arc<dyn Checkpointer>) -> Self {
        Self {
            graph,
            checkpointer,
            step_limit: super::runtime_config::DEFAULT_STEP_LIMIT,
        }
    }

    /// Overrides the per-walk step limit.
    #[must_use]
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Builds the engine and its checkpoint store from a [`RuntimeConfig`].
    pub async fn from_config(graph: Graph, config: &RuntimeConfig) -> Result<Self, EngineError> {
        let checkpointer: Arc<dyn Checkpointer> = match &config.checkpointer {
            CheckpointerType::InMemory => Arc::new(InMemoryCheckpointer::new()),
            #[cfg(feature = "sqlite")]
            CheckpointerType::Sqlite => {
                let db_url = config.sqlite_url();
                // Ensure the underlying sqlite file exists before connecting:
                // strip the scheme, create parent directories, then the file.
                if let Some(path) = db_url.strip_prefix("sqlite://") {
                    let path = path.trim();
                    if !path.is_empty() && path != ":memory:" {
                        let p = std::path::Path::new(path);
                        if let Some(parent) = p.parent() {
                            let _ = std::fs::create_dir_all(parent);
                        }
                        if !p.exists() {
                            let _ = std::fs::File::create_new(p);
                        }
                    }
                }
                Arc::new(super::checkpointer_sqlite::SqliteCheckpointer::connect(&db_url).await?)
            }
        };
        Ok(Self::new(graph, checkpointer).with_step_limit(config.step_limit))
    }

    /// The checkpoint store this engine persists through.
    #[must_use]
    pub fn checkpointer(&self) -> &Arc<dyn Checkpointer> {
        &self.checkpointer
    }

    /// Current lifecycle position of a session, if it has ever been
    /// persisted.
    pub async fn session_status(
        &self,
        session_id: &str,
    ) -> Result<Option<EngineStatus>, EngineError> {
        Ok(self
            .checkpointer
            .load(session_id)
            .await?
            .map(|cp| cp.status))
    }

    /// Process a user message for `session_id`.
    ///
    /// Loads (or initializes) the session state, appends the message as a
    /// human turn, and walks the graph from the entry node until the walk
    /// suspends or terminates. A suspended session rejects new submissions
    /// until the pending interrupt is answered via [`resume`](Self::resume).
    pub async fn submit(
        &self,
        session_id: &str,
        user_text: &str,
    ) -> Result<EngineResponse, EngineError> {
        let mut state = match self.checkpointer.load(session_id).await? {
            Some(cp) if cp.is_suspended() => {
                return Err(EngineError::AwaitingResume {
                    session_id: session_id.to_string(),
                });
            }
            // A terminated walk left the container reset; the new message
            // starts a fresh walk on the same session key.
            Some(cp) => cp.state,
            None => ConversationState::new(),
        };
        state.push_human(user_text);
        tracing::info!(session = %session_id, "processing user message");
        self.drive(session_id, state, self.graph.entry(), None, 0)
            .await
    }

    /// Feed an external answer back into a suspended session.
    ///
    /// Re-invokes the *same* node that suspended, with the answer injected
    /// through [`NodeContext::resume_input`], and continues the step loop
    /// from there. Resuming a session that is not suspended is an explicit
    /// error and leaves state untouched. The call is idempotent with
    /// respect to the stored checkpoint: replaying the same answer against
    /// a reloaded checkpoint yields the same next state.
    pub async fn resume(
        &self,
        session_id: &str,
        answer: &str,
    ) -> Result<EngineResponse, EngineError> {
        let checkpoint = self.checkpointer.load(session_id).await?;
        let Some(checkpoint) = checkpoint else {
            return Err(EngineError::NotSuspended {
                session_id: session_id.to_string(),
            });
        };
        let Some(node) = checkpoint.suspended_at.filter(|_| checkpoint.is_suspended()) else {
            return Err(EngineError::NotSuspended {
                session_id: session_id.to_string(),
            });
        };
        tracing::info!(session = %session_id, node = %node, "resuming suspended session");
        self.drive(
            session_id,
            checkpoint.state,
            node,
            Some(answer.to_string()),
            checkpoint.step,
        )
        .await
    }

    /// The step loop: invoke the current node, apply its result, repeat.
    async fn drive(
        &self,
        session_id: &str,
        mut state: ConversationState,
        mut current: NodeName,
        mut resume_input: Option<String>,
        start_step: u64,
    ) -> Result<EngineResponse, EngineError> {
        let mut step = start_step;
        let mut last_reply: Option<String> = None;

        loop {
            if step.saturating_sub(start_step) >= self.step_limit {
                return Err(EngineError::StepLimitExceeded {
                    session_id: session_id.to_string(),
                    limit: self.step_limit,
                });
            }
            step += 1;

            let node = self
                .graph
                .node(current)
                .ok_or(EngineError::UnknownNode { node: current })?;
            let ctx = NodeContext {
                session_id: session_id.to_string(),
                step,
                resume_input: resume_input.take(),
            };
            let result = Self::traced_execute(node.as_ref(), current, state, ctx).await?;

            match result {
                NodeResult::Continue(new_state) => {
                    state = new_state;
                    if let Some(reply) = state.last_assistant_text() {
                        last_reply = Some(reply.to_string());
                    }
                    match self.graph.successor(current, &state)? {
                        Some(next) => current = next,
                        None => {
                            // Terminal node: persist the (reset) state and
                            // hand back the latest assistant-facing content.
                            self.checkpointer
                                .save(Checkpoint::terminated(session_id, state, step))
                                .await?;
                            tracing::info!(session = %session_id, step, "walk terminated");
                            return Ok(EngineResponse {
                                assistant_text: Some(
                                    last_reply.unwrap_or_else(|| FALLBACK_REPLY.to_string()),
                                ),
                                interrupt: None,
                                status: EngineStatus::Terminated,
                            });
                        }
                    }
                }
                NodeResult::Goto(new_state, target) => {
                    state = new_state;
                    if let Some(reply) = state.last_assistant_text() {
                        last_reply = Some(reply.to_string());
                    }
                    if !self.graph.is_declared_jump(current, target) {
                        return Err(EngineError::UndeclaredJump {
                            from: current,
                            to: target,
                        });
                    }
                    tracing::debug!(from = %current, to = %target, "goto jump");
                    current = target;
                }
                NodeResult::Suspend(new_state, interrupt) => {
                    // Persist before returning: the checkpoint is the only
                    // artifact a suspended session holds.
                    self.checkpointer
                        .save(Checkpoint::suspended(
                            session_id,
                            new_state,
                            current,
                            interrupt.clone(),
                            step,
                        ))
                        .await?;
                    tracing::info!(
                        session = %session_id,
                        node = %current,
                        kind = %interrupt.kind,
                        "walk suspended"
                    );
                    return Ok(EngineResponse {
                        assistant_text: None,
                        interrupt: Some(interrupt),
                        status: EngineStatus::Suspended,
                    });
                }
            }
        }
    }

    /// Explicit logging middleware around every node call.
    ///
    /// All node entry/exit observability lives here, in one place the
    /// engine controls, rather than attached per-node.
    async fn traced_execute(
        node: &dyn Node,
        name: NodeName,
        state: ConversationState,
        ctx: NodeContext,
    ) -> Result<NodeResult, NodeError> {
        let span = tracing::info_span!(
            "node",
            node = %name,
            step = ctx.step,
            session = %ctx.session_id,
            resuming = ctx.resume_input.is_some(),
        );
        async move {
            tracing::debug!("entering node");
            let result = node.execute(state, ctx).await;
            match &result {
                Ok(NodeResult::Continue(_)) => tracing::debug!(outcome = "continue", "node done"),
                Ok(NodeResult::Goto(_, target)) => {
                    tracing::debug!(outcome = "goto", target = %target, "node done");
                }
                Ok(NodeResult::Suspend(_, _)) => {
                    tracing::debug!(outcome = "suspend", "node done");
                }
                Err(error) => tracing::error!(%error, "node failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
