//! Graph definition and compilation for workflow execution.
//!
//! This module provides the core graph building functionality for creating
//! conversational workflows with nodes, edges, and conditional routing. The
//! main entry point is [`GraphBuilder`], which uses a builder pattern to
//! construct workflows that compile into immutable [`Graph`] values
//! executed by the [`Engine`](crate::runtimes::Engine).
//!
//! # Core Concepts
//!
//! - **Nodes**: Executable units of work implementing the
//!   [`Node`](crate::node::Node) trait, registered under their
//!   [`NodeName`](crate::types::NodeName).
//! - **Static edges**: A single unconditional successor.
//! - **Conditional edges**: A [`Router`](crate::routing::Router) whose
//!   declared label space maps to target nodes; coverage is checked at
//!   compile time.
//! - **Goto edges**: Declared short-circuit jumps taken by
//!   [`NodeResult::Goto`](crate::node::NodeResult::Goto).
//! - **Compilation**: Validation (endpoints, label coverage, reachability)
//!   and conversion to an immutable [`Graph`].
//!
//! # Quick Start
//!
//! ```
//! use confab::collaborators::offline::{
//!     HeuristicDetailExtractor, KeywordIntentClassifier, OfflineCalendar,
//!     TemplateTextGenerator,
//! };
//! use confab::workflow::{Collaborators, build_workflow};
//! use std::sync::Arc;
//!
//! let collaborators = Collaborators {
//!     classifier: Arc::new(KeywordIntentClassifier::new()),
//!     generator: Arc::new(TemplateTextGenerator::new()),
//!     extractor: Arc::new(HeuristicDetailExtractor::new()),
//!     calendar: Arc::new(OfflineCalendar::new()),
//! };
//! let graph = build_workflow(&collaborators).expect("workflow graph compiles");
//! assert_eq!(graph.entry(), confab::types::NodeName::ClassifyIntent);
//! ```

// Internal module declarations
mod builder;
mod compilation;


// Public re-exports
pub use builder::{ConditionalEdge, GraphBuilder};
pub use compilation::{Graph, GraphCompileError, RouteMismatch};
