//! GraphBuilder implementation for constructing workflow graphs.
//!
//! This module contains the main GraphBuilder type and its fluent API for
//! assembling nodes and edges before compiling to an executable
//! [`Graph`](super::Graph).

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::node::Node;
use crate::routing::Router;
use crate::types::NodeName;

/// A conditional edge: a router plus the mapping from its branch labels to
/// target nodes.
#[derive(Clone)]
pub struct ConditionalEdge {
    pub(crate) router: Arc<dyn Router>,
    pub(crate) targets: FxHashMap<String, NodeName>,
}

impl ConditionalEdge {
    /// The router driving this edge.
    #[must_use]
    pub fn router(&self) -> &Arc<dyn Router> {
        &self.router
    }

    /// The label → node mapping.
    #[must_use]
    pub fn targets(&self) -> &FxHashMap<String, NodeName> {
        &self.targets
    }
}

/// Builder for constructing workflow graphs with a fluent API.
///
/// Every graph needs an entry node ([`set_entry`](Self::set_entry)) and a
/// registered node for each name the wiring refers to. Outgoing flow from a
/// node is either one static edge ([`add_edge`](Self::add_edge)) or one
/// conditional edge ([`add_conditional_edges`](Self::add_conditional_edges));
/// nodes that short-circuit via `Goto` declare their jump targets with
/// [`add_goto_edge`](Self::add_goto_edge) so compilation can validate them.
/// A node with no outgoing edge of any kind is terminal.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use confab::graphs::GraphBuilder;
/// use confab::node::{Node, NodeContext, NodeError, NodeResult};
/// use confab::state::ConversationState;
/// use confab::types::NodeName;
///
/// struct Terminal;
///
/// #[async_trait]
/// impl Node for Terminal {
///     fn name(&self) -> NodeName {
///         NodeName::End
///     }
///     async fn execute(
///         &self,
///         mut state: ConversationState,
///         _ctx: NodeContext,
///     ) -> Result<NodeResult, NodeError> {
///         state.reset();
///         Ok(NodeResult::Continue(state))
///     }
/// }
///
/// let graph = GraphBuilder::new()
///     .add_node(Terminal)
///     .set_entry(NodeName::End)
///     .compile()
///     .expect("single-node graph compiles");
/// assert_eq!(graph.entry(), NodeName::End);
/// ```
pub struct GraphBuilder {
    /// Registry of all nodes in the graph, keyed by their name.
    pub(crate) nodes: FxHashMap<NodeName, Arc<dyn Node>>,
    /// The entry node for every walk.
    pub(crate) entry: Option<NodeName>,
    /// Static single-successor edges.
    pub(crate) edges: FxHashMap<NodeName, NodeName>,
    /// Conditional edges for routing based on state.
    pub(crate) conditional_edges: FxHashMap<NodeName, ConditionalEdge>,
    /// Declared `Goto` short-circuit targets per node.
    pub(crate) goto_edges: FxHashMap<NodeName, Vec<NodeName>>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a new, empty graph builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            entry: None,
            edges: FxHashMap::default(),
            conditional_edges: FxHashMap::default(),
            goto_edges: FxHashMap::default(),
        }
    }

    /// Registers a node under the name it declares.
    ///
    /// Registering a second node under the same name replaces the first;
    /// a warning is emitted since this is almost always a wiring mistake.
    #[must_use]
    pub fn add_node(mut self, node: impl Node + 'static) -> Self {
        let name = node.name();
        if self.nodes.insert(name, Arc::new(node)).is_some() {
            tracing::warn!(node = %name, "replacing previously registered node");
        }
        self
    }

    /// Declares the entry node every walk starts from.
    #[must_use]
    pub fn set_entry(mut self, entry: NodeName) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Adds a static edge: after `from` continues, execution moves to `to`.
    #[must_use]
    pub fn add_edge(mut self, from: NodeName, to: NodeName) -> Self {
        if self.edges.insert(from, to).is_some() {
            tracing::warn!(node = %from, "replacing previously declared static edge");
        }
        self
    }

    /// Adds a conditional edge driven by `router`.
    ///
    /// `targets` maps each branch label the router can emit to the node it
    /// routes to. Compilation verifies the mapping covers the router's
    /// declared label space exactly.
    #[must_use]
    pub fn add_conditional_edges<S, I>(
        mut self,
        from: NodeName,
        router: impl Router + 'static,
        targets: I,
    ) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, NodeName)>,
    {
        let targets = targets
            .into_iter()
            .map(|(label, to)| (label.into(), to))
            .collect();
        let edge = ConditionalEdge {
            router: Arc::new(router),
            targets,
        };
        if self.conditional_edges.insert(from, edge).is_some() {
            tracing::warn!(node = %from, "replacing previously declared conditional edge");
        }
        self
    }

    /// Declares that `from` may `Goto` directly to `to`.
    ///
    /// Goto jumps bypass edge lookup at runtime; declaring them here keeps
    /// target validation and reachability analysis compile-time concerns.
    #[must_use]
    pub fn add_goto_edge(mut self, from: NodeName, to: NodeName) -> Self {
        self.goto_edges.entry(from).or_default().push(to);
        self
    }
}
