//! # Operation Executor
//!
//! Orchestrates one request against the shared graph: resolve the wire
//! format, build the needed sinks, then drive either an enumeration pass
//! (reads) or a decode-apply-reencode pass (writes).
//!
//! The executor holds the shared graph reference, the injected format
//! registry, and two flags fixed for its lifetime: whether projected
//! attributes include visualization data, and whether ingested updates are
//! echoed back to the caller.
//!
//! ## Fault model
//!
//! Faults are never retried or suppressed; whatever prefix of events was
//! applied to the graph before a mid-stream fault remains applied (graph
//! mutation is not transactional across a request). No fault leaves a
//! lock held.

use crate::applier::GraphUpdater;
use crate::event::{CompositeSink, OperationSink, StreamEvent};
use crate::formats::FormatRegistry;
use crate::graph::SharedGraph;
use crate::projector;
use crate::snapshot;
use crate::types::GraphWireError;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Per-request orchestrator for the four core operations.
pub struct OperationExecutor {
    graph: SharedGraph,
    registry: Arc<FormatRegistry>,
    send_viz_data: bool,
    echo_updates: bool,
}

impl OperationExecutor {
    /// Create an executor over a shared graph and an injected registry.
    ///
    /// Visualization data and update echo are both enabled by default.
    #[must_use]
    pub fn new(graph: SharedGraph, registry: Arc<FormatRegistry>) -> Self {
        Self {
            graph,
            registry,
            send_viz_data: true,
            echo_updates: true,
        }
    }

    /// Choose whether projected attributes carry visualization fields.
    #[must_use]
    pub fn with_viz_data(mut self, send: bool) -> Self {
        self.send_viz_data = send;
        self
    }

    /// Choose whether ingested updates are echoed to the output stream.
    /// With echo off, ingestion applies mutations only.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo_updates = echo;
        self
    }

    /// The shared graph this executor operates on.
    #[must_use]
    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    /// The injected format registry.
    #[must_use]
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Export the whole graph: stream-start, then a full snapshot.
    ///
    /// The stream is deliberately left open — no stream-end is emitted and
    /// the live encoder is handed back, so the caller can compose the
    /// snapshot with a subsequent live update feed without re-framing, or
    /// simply drop the encoder to close the stream.
    pub fn export_graph<'w>(
        &self,
        format: &str,
        out: &'w mut dyn Write,
    ) -> Result<Box<dyn OperationSink + 'w>, GraphWireError> {
        let mut encoder = self.registry.encoder(format, out)?;
        encoder.handle(&StreamEvent::StreamStart)?;
        snapshot::stream_into(&self.graph, self.send_viz_data, encoder.as_mut())?;
        Ok(encoder)
    }

    /// Export a single node as a fully framed stream.
    ///
    /// An absent identifier is not an error: the output then contains only
    /// the framing markers. Projection happens under the read lock; the
    /// lock is dropped before the event is written out.
    pub fn export_node(
        &self,
        format: &str,
        id: &str,
        out: &mut dyn Write,
    ) -> Result<(), GraphWireError> {
        let mut encoder = self.registry.encoder(format, out)?;
        encoder.handle(&StreamEvent::StreamStart)?;
        let event = {
            let g = self.graph.read();
            g.node(id)
                .map(|node| projector::node_added_event(node, self.send_viz_data))
        };
        if let Some(event) = event {
            encoder.handle(&event)?;
        }
        encoder.handle(&StreamEvent::StreamEnd)
    }

    /// Export a single edge as a fully framed stream, carrying source,
    /// target and directedness. Same shape as `export_node`.
    pub fn export_edge(
        &self,
        format: &str,
        id: &str,
        out: &mut dyn Write,
    ) -> Result<(), GraphWireError> {
        let mut encoder = self.registry.encoder(format, out)?;
        encoder.handle(&StreamEvent::StreamStart)?;
        let event = {
            let g = self.graph.read();
            g.edge(id)
                .map(|edge| projector::edge_added_event(edge, self.send_viz_data))
        };
        if let Some(event) = event {
            encoder.handle(&event)?;
        }
        encoder.handle(&StreamEvent::StreamEnd)
    }

    /// Ingest an update stream, applying every decoded event to the graph
    /// and (echo enabled) re-emitting it to the output stream in the same
    /// pass, mutation always ordered before re-emission.
    ///
    /// Framing is the codec's responsibility per event it forwards; the
    /// executor adds none of its own.
    pub fn update_graph(
        &self,
        format: &str,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<(), GraphWireError> {
        let mut decoder = self.registry.decoder(format)?;
        let mut composite = CompositeSink::new();
        composite.push(Box::new(GraphUpdater::new(self.graph.clone())));
        if self.echo_updates {
            composite.push(self.registry.encoder(format, out)?);
        }
        decoder.decode(input, &mut composite)
    }
}

// =============================================================================
// TESTS
// =============================================================================
