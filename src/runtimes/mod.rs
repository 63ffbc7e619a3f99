//! Workflow runtime infrastructure: the execution engine, session
//! checkpointing, and state persistence.
//!
//! # Architecture
//!
//! - **[`Engine`]** - walks a compiled graph for one session at a time,
//!   exposing the caller-facing `submit`/`resume` API.
//! - **[`Checkpointer`]** - trait for pluggable checkpoint persistence.
//! - **Persistence models** - serde-friendly shapes decoupled from the
//!   in-memory types (see [`persistence`]).
//!
//! # Persistence Backends
//!
//! - **[`InMemoryCheckpointer`]** - volatile storage for testing and
//!   ephemeral runs.
//! - **`SqliteCheckpointer`** - durable SQLite-backed persistence
//!   (feature `sqlite`, default on).
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use confab::collaborators::offline::{
//!     HeuristicDetailExtractor, KeywordIntentClassifier, OfflineCalendar,
//!     TemplateTextGenerator,
//! };
//! use confab::runtimes::{Engine, RuntimeConfig};
//! use confab::workflow::{Collaborators, build_workflow};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let collaborators = Collaborators {
//!     classifier: Arc::new(KeywordIntentClassifier::new()),
//!     generator: Arc::new(TemplateTextGenerator::new()),
//!     extractor: Arc::new(HeuristicDetailExtractor::new()),
//!     calendar: Arc::new(OfflineCalendar::new()),
//! };
//! let graph = build_workflow(&collaborators)?;
//! let engine = Engine::from_config(graph, &RuntimeConfig::default()).await?;
//!
//! let response = engine.submit("session-1", "hello!").await?;
//! println!("{:?}", response.assistant_text);
//! # Ok(())
//! # }
//! ```

pub mod checkpointer;
#[cfg(feature = "sqlite")]
pub mod checkpointer_sqlite;
pub mod engine;
pub mod persistence;
pub mod runtime_config;

pub use checkpointer::{
    Checkpoint, Checkpointer, CheckpointerError, CheckpointerType, EngineStatus,
    InMemoryCheckpointer,
};
#[cfg(feature = "sqlite")]
pub use checkpointer_sqlite::SqliteCheckpointer;
pub use engine::{Engine, EngineError, EngineResponse};
pub use persistence::{FORMAT_VERSION, PersistedCheckpoint, PersistenceError};
pub use runtime_config::{DEFAULT_STEP_LIMIT, RuntimeConfig};
