//! # Shared Graph
//!
//! The live mutable graph and its concurrency wrapper.
//!
//! The graph owns precondition enforcement for mutations: duplicate
//! identifiers, dangling edge endpoints and operations on absent entities
//! are rejected with `GraphWireError` rather than silently ignored.
//!
//! `SharedGraph` is the handle the rest of the core holds: a cloneable
//! reference to one graph behind a reader-writer lock. Readers share the
//! lock and block writers; a writer is exclusive. Guards release on drop,
//! on every exit path.

use crate::types::{AttributeRow, Attributes, EdgeVisual, GraphWireError, NodeVisual};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

// =============================================================================
// NODE & EDGE
// =============================================================================

/// A node of the graph: identifier, attribute row, visualization fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    row: AttributeRow,
    /// Position, color and size. Always present, independent of the row.
    pub visual: NodeVisual,
}

impl Node {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            row: AttributeRow::for_entity(id),
            visual: NodeVisual::default(),
        }
    }

    /// The node identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The attribute row attached to this node.
    #[must_use]
    pub fn row(&self) -> &AttributeRow {
        &self.row
    }

    /// Mutable access to the attribute row.
    pub fn row_mut(&mut self) -> &mut AttributeRow {
        &mut self.row
    }
}

/// An edge of the graph. Source and target reference nodes that were
/// present when the edge was added.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
    directed: bool,
    row: AttributeRow,
    /// Position, color and weight. Always present, independent of the row.
    pub visual: EdgeVisual,
}

impl Edge {
    /// The edge identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the source node.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identifier of the target node.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the edge is directed.
    #[must_use]
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// The attribute row attached to this edge.
    #[must_use]
    pub fn row(&self) -> &AttributeRow {
        &self.row
    }

    /// Mutable access to the attribute row.
    pub fn row_mut(&mut self) -> &mut AttributeRow {
        &mut self.row
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// The graph itself. `BTreeMap`-backed, so enumeration order is the
/// lexicographic order of identifiers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<String, Edge>,
    /// Node id -> ids of incident edges, kept for cascade removal.
    incident: BTreeMap<String, BTreeSet<String>>,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the given attributes.
    ///
    /// Returns `GraphWireError::DuplicateNode` if the identifier is taken.
    pub fn add_node(&mut self, id: &str, attributes: &Attributes) -> Result<(), GraphWireError> {
        if self.nodes.contains_key(id) {
            return Err(GraphWireError::DuplicateNode(id.to_string()));
        }
        let mut node = Node::new(id);
        for (title, value) in attributes {
            node.row.set(title, value.clone())?;
        }
        self.nodes.insert(id.to_string(), node);
        Ok(())
    }

    /// Remove a node and all its incident edges.
    ///
    /// Returns `GraphWireError::NodeNotFound` if absent.
    pub fn remove_node(&mut self, id: &str) -> Result<(), GraphWireError> {
        if self.nodes.remove(id).is_none() {
            return Err(GraphWireError::NodeNotFound(id.to_string()));
        }
        if let Some(edge_ids) = self.incident.remove(id) {
            for edge_id in edge_ids {
                if let Some(edge) = self.edges.remove(&edge_id) {
                    let other = if edge.source == id {
                        &edge.target
                    } else {
                        &edge.source
                    };
                    if let Some(set) = self.incident.get_mut(other) {
                        set.remove(&edge_id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Add an edge between two present nodes.
    ///
    /// Precondition: both endpoints must currently exist in the graph.
    /// Returns `GraphWireError::MissingEndpoint` otherwise, and
    /// `GraphWireError::DuplicateEdge` if the identifier is taken.
    pub fn add_edge(
        &mut self,
        id: &str,
        source: &str,
        target: &str,
        directed: bool,
        attributes: &Attributes,
    ) -> Result<(), GraphWireError> {
        if self.edges.contains_key(id) {
            return Err(GraphWireError::DuplicateEdge(id.to_string()));
        }
        for endpoint in [source, target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphWireError::MissingEndpoint {
                    edge: id.to_string(),
                    node: endpoint.to_string(),
                });
            }
        }
        let mut edge = Edge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            directed,
            row: AttributeRow::for_entity(id),
            visual: EdgeVisual::default(),
        };
        for (title, value) in attributes {
            edge.row.set(title, value.clone())?;
        }
        self.edges.insert(id.to_string(), edge);
        for endpoint in [source, target] {
            self.incident
                .entry(endpoint.to_string())
                .or_default()
                .insert(id.to_string());
        }
        Ok(())
    }

    /// Remove an edge.
    ///
    /// Returns `GraphWireError::EdgeNotFound` if absent.
    pub fn remove_edge(&mut self, id: &str) -> Result<(), GraphWireError> {
        let Some(edge) = self.edges.remove(id) else {
            return Err(GraphWireError::EdgeNotFound(id.to_string()));
        };
        for endpoint in [&edge.source, &edge.target] {
            if let Some(set) = self.incident.get_mut(endpoint) {
                set.remove(id);
            }
        }
        Ok(())
    }

    /// Merge attributes into the entity with the given identifier.
    ///
    /// The target is resolved as a node first, then as an edge. Returns
    /// `GraphWireError::EntityNotFound` when neither exists.
    pub fn set_attributes(
        &mut self,
        id: &str,
        attributes: &Attributes,
    ) -> Result<(), GraphWireError> {
        let row = if let Some(node) = self.nodes.get_mut(id) {
            node.row_mut()
        } else if let Some(edge) = self.edges.get_mut(id) {
            edge.row_mut()
        } else {
            return Err(GraphWireError::EntityNotFound(id.to_string()));
        };
        for (title, value) in attributes {
            row.set(title, value.clone())?;
        }
        Ok(())
    }

    /// Look up a node by identifier.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable lookup of a node, for visualization field updates.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Look up an edge by identifier.
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Mutable lookup of an edge.
    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    /// Iterate all nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate all edges in identifier order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// =============================================================================
// SHARED GRAPH HANDLE
// =============================================================================

/// Cloneable handle to one graph shared across request contexts.
///
/// The core never owns the graph lifecycle; it acquires and releases the
/// graph's locks. Read-only operations hold the read lock for the minimum
/// span covering lookup-and-projection; the mutation applier takes the
/// write lock per decoded event, so a long ingest does not starve readers.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<Graph>>,
}

impl SharedGraph {
    /// Create a handle to a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already populated graph.
    #[must_use]
    pub fn from_graph(graph: Graph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Acquire the shared read lock. Many concurrent holders; blocks
    /// writers until every guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, Graph> {
        self.inner.read()
    }

    /// Acquire the exclusive write lock. One holder; blocks readers and
    /// other writers.
    pub fn write(&self) -> RwLockWriteGuard<'_, Graph> {
        self.inner.write()
    }
}

// =============================================================================
// TESTS
// =============================================================================
