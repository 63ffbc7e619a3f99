//! # Confab: Conversational Workflow Engine
//!
//! Confab is a small directed graph of processing steps ("nodes") that
//! advances a per-conversation state object, conditionally branches
//! between steps, and can suspend mid-execution to request external input
//! before resuming exactly where it left off - with durable, per-session
//! checkpointing.
//!
//! ## Core Concepts
//!
//! - **Nodes**: Async units of work implementing the [`node::Node`] trait,
//!   named by the closed [`types::NodeName`] enumeration.
//! - **State**: The [`state::ConversationState`] container carried between
//!   nodes - the only channel nodes share.
//! - **Routers**: Total functions from state to a declared branch label;
//!   the graph compiler checks label coverage structurally.
//! - **Graph**: Declarative workflow definition compiled into an immutable
//!   [`graphs::Graph`].
//! - **Engine**: The step loop with the suspend/resume protocol and the
//!   caller-facing `submit`/`resume` API ([`runtimes::Engine`]).
//! - **Checkpoints**: One durable snapshot per session, replaced on every
//!   write ([`runtimes::Checkpointer`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use confab::runtimes::{Engine, InMemoryCheckpointer};
//! use confab::workflow::{Collaborators, build_workflow};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = build_workflow(&Collaborators::offline())?;
//! let engine = Engine::new(graph, Arc::new(InMemoryCheckpointer::new()));
//!
//! // A fully-specified request books directly...
//! let done = engine
//!     .submit("demo", "Schedule a standup with Jane tomorrow 9am for 30 minutes")
//!     .await?;
//! assert!(done.assistant_text.is_some());
//!
//! // ...while a sparse one suspends with a question to answer via resume().
//! let asked = engine.submit("demo", "book a meeting").await?;
//! if let Some(interrupt) = asked.interrupt {
//!     println!("engine asks: {}", interrupt.question);
//!     engine.resume("demo", "Sprint sync with Bob tomorrow 10am for 45 minutes").await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`message`] - Conversation turn types
//! - [`state`] - The per-session state container and intents
//! - [`details`] - Collected event details and required-field policy
//! - [`interrupt`] - Structured suspension requests
//! - [`node`] - Node trait and execution primitives
//! - [`routing`] - Total routers with declared label spaces
//! - [`graphs`] - Workflow graph definition and compilation
//! - [`nodes`] - The scheduling-assistant node set
//! - [`collaborators`] - External collaborator contracts and offline impls
//! - [`workflow`] - Dependency-injected graph assembly
//! - [`runtimes`] - Execution engine and checkpointing
//! - [`telemetry`] - Tracing subscriber bootstrap

pub mod collaborators;
pub mod details;
pub mod graphs;
pub mod interrupt;
pub mod message;
pub mod node;
pub mod nodes;
pub mod prompts;
pub mod routing;
pub mod runtimes;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod utils;
pub mod workflow;
