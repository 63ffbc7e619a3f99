//! Graph compilation logic and validation.
//!
//! This module contains the logic for compiling a [`GraphBuilder`] into an
//! immutable, validated [`Graph`]: endpoint checks, router label coverage,
//! and reachability analysis. Compilation is a one-time pure operation with
//! no side effects; recompiling the same builder configuration always
//! yields an equivalent graph.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

use super::builder::{ConditionalEdge, GraphBuilder};
use crate::node::Node;
use crate::state::ConversationState;
use crate::types::NodeName;

/// Errors detected while compiling a graph.
///
/// All of these are wiring mistakes: they are reported at compile time so
/// they cannot surface mid-conversation.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphCompileError {
    /// No entry node was declared.
    #[error("graph has no entry node")]
    #[diagnostic(
        code(confab::graph::missing_entry),
        help("Declare the entry node with GraphBuilder::set_entry.")
    )]
    MissingEntry,

    /// Wiring refers to a node that was never registered.
    #[error("unregistered node {node} referenced by {context}")]
    #[diagnostic(
        code(confab::graph::unregistered_node),
        help("Register the node with GraphBuilder::add_node before wiring it.")
    )]
    UnregisteredNode { node: NodeName, context: String },

    /// A router label has no mapped target node.
    #[error("conditional edge from {node} leaves router label '{label}' unmapped")]
    #[diagnostic(
        code(confab::graph::unmapped_label),
        help("Every label the router can emit must map to a registered node.")
    )]
    UnmappedLabel { node: NodeName, label: String },

    /// A mapped label is outside the router's declared output space.
    #[error("conditional edge from {node} maps label '{label}' the router never emits")]
    #[diagnostic(
        code(confab::graph::unknown_label),
        help("Remove the stale mapping or extend the router's declared labels.")
    )]
    UnknownLabel { node: NodeName, label: String },

    /// A node has both a static and a conditional successor.
    #[error("node {node} has both a static edge and a conditional edge")]
    #[diagnostic(
        code(confab::graph::conflicting_edges),
        help("A node's outgoing flow is either one static edge or one conditional edge.")
    )]
    ConflictingEdges { node: NodeName },

    /// A registered node cannot be reached from the entry.
    #[error("node {node} is unreachable from the entry node")]
    #[diagnostic(
        code(confab::graph::unreachable),
        help("Wire the node into the graph or remove its registration.")
    )]
    Unreachable { node: NodeName },
}

/// Raised when a conditional edge produces an unmapped label at runtime.
///
/// Compilation makes this structurally impossible for well-behaved routers;
/// if a router violates its declared label space anyway, the engine raises
/// this instead of silently defaulting.
#[derive(Debug, Error, Diagnostic)]
#[error("conditional edge from {node} produced unmapped label '{label}' at runtime")]
#[diagnostic(code(confab::graph::route_mismatch))]
pub struct RouteMismatch {
    pub node: NodeName,
    pub label: String,
}

/// An immutable, validated workflow graph.
///
/// Produced by [`GraphBuilder::compile`]; consumed by the execution engine.
/// Cloning is cheap (nodes and routers are reference-counted).
#[derive(Clone)]
pub struct Graph {
    nodes: FxHashMap<NodeName, Arc<dyn Node>>,
    entry: NodeName,
    edges: FxHashMap<NodeName, NodeName>,
    conditional_edges: FxHashMap<NodeName, ConditionalEdge>,
    goto_edges: FxHashMap<NodeName, Vec<NodeName>>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_names())
            .field("entry", &self.entry)
            .field("edges", &self.edges)
            .field(
                "conditional_edges",
                &self.conditional_edges.keys().collect::<Vec<_>>(),
            )
            .field("goto_edges", &self.goto_edges)
            .finish()
    }
}

impl Graph {
    /// The node every walk starts from.
    #[must_use]
    pub fn entry(&self) -> NodeName {
        self.entry
    }

    /// Look up a registered node implementation.
    #[must_use]
    pub fn node(&self, name: NodeName) -> Option<&Arc<dyn Node>> {
        self.nodes.get(&name)
    }

    /// Names of all registered nodes, in declaration-enum order.
    #[must_use]
    pub fn node_names(&self) -> Vec<NodeName> {
        NodeName::ALL
            .iter()
            .copied()
            .filter(|n| self.nodes.contains_key(n))
            .collect()
    }

    /// Whether `from` declared `to` as a `Goto` target.
    #[must_use]
    pub fn is_declared_jump(&self, from: NodeName, to: NodeName) -> bool {
        self.goto_edges
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    /// The node execution moves to after `from` continues.
    ///
    /// Consults the static edge first, then the conditional edge's router.
    /// `Ok(None)` means `from` is terminal. `Err` is only possible when a
    /// router emits a label outside its declared space at runtime.
    pub fn successor(
        &self,
        from: NodeName,
        state: &ConversationState,
    ) -> Result<Option<NodeName>, RouteMismatch> {
        if let Some(to) = self.edges.get(&from) {
            return Ok(Some(*to));
        }
        if let Some(edge) = self.conditional_edges.get(&from) {
            let label = edge.router().route(state);
            return match edge.targets().get(label) {
                Some(to) => Ok(Some(*to)),
                None => Err(RouteMismatch {
                    node: from,
                    label: label.to_string(),
                }),
            };
        }
        Ok(None)
    }
}

/// Compilation logic for GraphBuilder.
impl GraphBuilder {
    /// Compiles the graph into an immutable, validated [`Graph`].
    ///
    /// Validation checks, in order:
    /// - an entry node is declared and registered;
    /// - every static, conditional, and goto edge endpoint is registered;
    /// - no node has both a static and a conditional successor;
    /// - each conditional edge's mapping covers its router's declared
    ///   label space exactly (no unmapped and no unknown labels);
    /// - every registered node is reachable from the entry.
    pub fn compile(self) -> Result<Graph, GraphCompileError> {
        let entry = self.entry.ok_or(GraphCompileError::MissingEntry)?;
        self.require_registered(entry, "the entry declaration")?;

        // Endpoint validation, in stable NodeName order for deterministic
        // error reporting.
        for from in NodeName::ALL {
            if let Some(to) = self.edges.get(&from) {
                self.require_registered(from, "a static edge source")?;
                self.require_registered(*to, &format!("the static edge from {from}"))?;
            }
            if let Some(targets) = self.goto_edges.get(&from) {
                self.require_registered(from, "a goto edge source")?;
                for to in targets {
                    self.require_registered(*to, &format!("a goto edge from {from}"))?;
                }
            }
            if let Some(edge) = self.conditional_edges.get(&from) {
                self.require_registered(from, "a conditional edge source")?;
                if self.edges.contains_key(&from) {
                    return Err(GraphCompileError::ConflictingEdges { node: from });
                }
                let declared = edge.router().labels();
                for label in declared {
                    match edge.targets().get(*label) {
                        Some(to) => self.require_registered(
                            *to,
                            &format!("the conditional edge from {from} (label '{label}')"),
                        )?,
                        None => {
                            return Err(GraphCompileError::UnmappedLabel {
                                node: from,
                                label: (*label).to_string(),
                            });
                        }
                    }
                }
                for label in edge.targets().keys() {
                    if !declared.contains(&label.as_str()) {
                        return Err(GraphCompileError::UnknownLabel {
                            node: from,
                            label: label.clone(),
                        });
                    }
                }
            }
        }

        self.check_reachability(entry)?;

        Ok(Graph {
            nodes: self.nodes,
            entry,
            edges: self.edges,
            conditional_edges: self.conditional_edges,
            goto_edges: self.goto_edges,
        })
    }

    fn require_registered(
        &self,
        node: NodeName,
        context: &str,
    ) -> Result<(), GraphCompileError> {
        if self.nodes.contains_key(&node) {
            Ok(())
        } else {
            Err(GraphCompileError::UnregisteredNode {
                node,
                context: context.to_string(),
            })
        }
    }

    /// Breadth-first reachability over static, conditional, and goto edges.
    fn check_reachability(&self, entry: NodeName) -> Result<(), GraphCompileError> {
        let mut seen: Vec<NodeName> = vec![entry];
        let mut queue: VecDeque<NodeName> = VecDeque::from([entry]);
        while let Some(current) = queue.pop_front() {
            let mut neighbors: Vec<NodeName> = Vec::new();
            if let Some(to) = self.edges.get(&current) {
                neighbors.push(*to);
            }
            if let Some(edge) = self.conditional_edges.get(&current) {
                neighbors.extend(edge.targets().values().copied());
            }
            if let Some(targets) = self.goto_edges.get(&current) {
                neighbors.extend(targets.iter().copied());
            }
            for neighbor in neighbors {
                if !seen.contains(&neighbor) {
                    seen.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        for node in NodeName::ALL {
            if self.nodes.contains_key(&node) && !seen.contains(&node) {
                return Err(GraphCompileError::Unreachable { node });
            }
        }
        Ok(())
    }
}
