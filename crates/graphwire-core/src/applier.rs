//! # Graph Mutation Applier
//!
//! An operation sink that translates each decoded stream event into the
//! corresponding mutation of the live shared graph.
//!
//! The write lock is taken per event, not for the whole stream, so a
//! long-running ingest does not starve readers between individual events.
//! Precondition enforcement lives in the graph itself; violations (dangling
//! endpoints, duplicate or absent identifiers) propagate as faults rather
//! than being silently ignored.

use crate::event::{OperationSink, StreamEvent};
use crate::graph::SharedGraph;
use crate::types::GraphWireError;

/// Applies decoded events to a shared graph.
pub struct GraphUpdater {
    graph: SharedGraph,
}

impl GraphUpdater {
    /// Create an applier targeting the given graph.
    #[must_use]
    pub fn new(graph: SharedGraph) -> Self {
        Self { graph }
    }
}

impl OperationSink for GraphUpdater {
    fn handle(&mut self, event: &StreamEvent) -> Result<(), GraphWireError> {
        match event {
            // Framing markers carry no mutation.
            StreamEvent::StreamStart | StreamEvent::StreamEnd => Ok(()),
            StreamEvent::NodeAdded { id, attributes } => {
                self.graph.write().add_node(id, attributes)
            }
            StreamEvent::NodeRemoved { id } => self.graph.write().remove_node(id),
            StreamEvent::EdgeAdded {
                id,
                source,
                target,
                directed,
                attributes,
            } => self
                .graph
                .write()
                .add_edge(id, source, target, *directed, attributes),
            StreamEvent::EdgeRemoved { id } => self.graph.write().remove_edge(id),
            StreamEvent::AttributesChanged { id, attributes } => {
                self.graph.write().set_attributes(id, attributes)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
