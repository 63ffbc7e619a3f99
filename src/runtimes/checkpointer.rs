//! Checkpointer infrastructure.
//!
//! A [`Checkpoint`] is the durable snapshot of one session: the
//! conversation state plus, when the session is suspended, the node to
//! re-enter and the interrupt owed to the caller. Exactly one checkpoint
//! exists per live session - saving overwrites the previous one
//! (last-write-wins, no history).
//!
//! Backends implement the [`Checkpointer`] trait. The in-memory
//! implementation here suits tests and ephemeral runs; the SQLite backend
//! (see `checkpointer_sqlite`) provides durability across process
//! restarts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::interrupt::Interrupt;
use crate::state::ConversationState;
use crate::types::NodeName;

/// Lifecycle position of a session, persisted with its checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    /// A walk is in progress. Never persisted: checkpoints are only written
    /// at suspension or termination.
    Running,
    /// The session is waiting on an external answer.
    Suspended,
    /// The last walk reached the terminal node.
    Terminated,
}

impl EngineStatus {
    /// Stable string form, matching the serialized representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineStatus::Running => "running",
            EngineStatus::Suspended => "suspended",
            EngineStatus::Terminated => "terminated",
        }
    }
}

/// A durable snapshot of session execution state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub session_id: String,
    /// Step counter of the walk that produced this checkpoint.
    pub step: u64,
    pub state: ConversationState,
    pub status: EngineStatus,
    /// The node to re-enter on resume; set iff the session is suspended.
    pub suspended_at: Option<NodeName>,
    /// The interrupt owed to the caller; set iff the session is suspended.
    pub interrupt: Option<Interrupt>,
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Snapshot of a session suspended at `node` with `interrupt` pending.
    #[must_use]
    pub fn suspended(
        session_id: &str,
        state: ConversationState,
        node: NodeName,
        interrupt: Interrupt,
        step: u64,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            step,
            state,
            status: EngineStatus::Suspended,
            suspended_at: Some(node),
            interrupt: Some(interrupt),
            created_at: Utc::now(),
        }
    }

    /// Snapshot of a session whose walk reached the terminal node.
    #[must_use]
    pub fn terminated(session_id: &str, state: ConversationState, step: u64) -> Self {
        Self {
            session_id: session_id.to_string(),
            step,
            state,
            status: EngineStatus::Terminated,
            suspended_at: None,
            interrupt: None,
            created_at: Utc::now(),
        }
    }

    /// True when this checkpoint represents a suspended session.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.status == EngineStatus::Suspended
    }
}

/// Errors from checkpointer operations.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CheckpointerError {
    /// Backend storage error (database, filesystem, etc.).
    #[error("backend error: {message}")]
    #[diagnostic(
        code(confab::checkpointer::backend),
        help("Check backend connectivity and permissions.")
    )]
    Backend { message: String },

    /// Other checkpointer errors (serialization, corruption).
    #[error("checkpointer error: {message}")]
    #[diagnostic(code(confab::checkpointer::other))]
    Other { message: String },
}

/// Selects the backing implementation of the [`Checkpointer`] trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointerType {
    /// In-memory (non-durable) checkpointing.
    InMemory,
    /// SQLite-backed durable checkpointing (see `SqliteCheckpointer`).
    #[cfg(feature = "sqlite")]
    Sqlite,
}

pub type Result<T> = std::result::Result<T, CheckpointerError>;

/// Trait for persistent storage and retrieval of session checkpoints.
///
/// Implementations must preserve an exact round-trip of the conversation
/// state - no silent coercion of optional fields - and replace any existing
/// checkpoint for the session on `save`. Concurrent access to *different*
/// sessions must not interfere; serializing concurrent calls for the *same*
/// session is the integration's responsibility, not the store's.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Persist the checkpoint for its session, replacing any previous one.
    async fn save(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Load the checkpoint for a session, or `None` if the session has
    /// never been persisted.
    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>>;

    /// List all session IDs known to this checkpointer.
    async fn list_sessions(&self) -> Result<Vec<String>>;
}

/// Simple in-memory checkpointer. Stores only the latest checkpoint per
/// session.
#[derive(Default)]
pub struct InMemoryCheckpointer {
    inner: RwLock<FxHashMap<String, Checkpoint>>,
}

impl InMemoryCheckpointer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(FxHashMap::default()),
        }
    }
}

#[async_trait]
impl Checkpointer for InMemoryCheckpointer {
    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        self.inner
            .write()
            .insert(checkpoint.session_id.clone(), checkpoint);
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>> {
        Ok(self.inner.read().get(session_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.inner.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let store = InMemoryCheckpointer::new();
        let state = ConversationState::new_with_human_message("hi");
        let interrupt = Interrupt::seek_more_info("need info", "what time?");
        let checkpoint = Checkpoint::suspended("sess1", state, NodeName::SeekMoreInfo, interrupt, 4);
        store.save(checkpoint.clone()).await.unwrap();

        let loaded = store.load("sess1").await.unwrap().unwrap();
        assert_eq!(loaded.step, 4);
        assert_eq!(loaded.suspended_at, Some(NodeName::SeekMoreInfo));
        assert_eq!(loaded.state, checkpoint.state);
        assert!(loaded.is_suspended());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_checkpoint() {
        let store = InMemoryCheckpointer::new();
        let state = ConversationState::new_with_human_message("hi");
        store
            .save(Checkpoint::terminated("sess1", state.clone(), 1))
            .await
            .unwrap();
        store
            .save(Checkpoint::terminated("sess1", state, 7))
            .await
            .unwrap();
        let loaded = store.load("sess1").await.unwrap().unwrap();
        assert_eq!(loaded.step, 7);
        assert_eq!(store.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_loads_none() {
        let store = InMemoryCheckpointer::new();
        assert!(store.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sessions() {
        let store = InMemoryCheckpointer::new();
        let state = ConversationState::new();
        store
            .save(Checkpoint::terminated("beta", state.clone(), 1))
            .await
            .unwrap();
        store
            .save(Checkpoint::terminated("alpha", state, 1))
            .await
            .unwrap();
        assert_eq!(store.list_sessions().await.unwrap(), vec!["alpha", "beta"]);
    }
}
