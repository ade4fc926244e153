//! # Graph Snapshot Enumerator
//!
//! Replays the present state of the graph into a sink as a bounded,
//! deterministic-length sequence of node-added and edge-added events.
//! This is not a live subscription: events describe the graph as it was
//! at enumeration time.

use crate::event::OperationSink;
use crate::graph::SharedGraph;
use crate::projector;
use crate::types::GraphWireError;

/// Enumerate every node, then every edge, into the sink.
///
/// The read lock is held for the whole enumeration, so the emitted
/// sequence is a consistent snapshot: no concurrent writer can interleave
/// a mutation between two events. All node-added events precede all
/// edge-added events, so a consumer never sees an edge referencing a node
/// it has not been told about. The lock is released when this returns,
/// on the error path included.
pub fn stream_into<S: OperationSink + ?Sized>(
    graph: &SharedGraph,
    include_viz: bool,
    sink: &mut S,
) -> Result<(), GraphWireError> {
    let g = graph.read();
    for node in g.nodes() {
        sink.handle(&projector::node_added_event(node, include_viz))?;
    }
    for edge in g.edges() {
        sink.handle(&projector::edge_added_event(edge, include_viz))?;
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
