//! # Stream Events & Operation Sinks
//!
//! One discrete graph change or lifecycle marker, and the consumption
//! contract for sequences of them.
//!
//! Events are immutable and ephemeral: they exist only in transit between
//! a decoder or enumerator and one or more sinks, and are never persisted.
//!
//! ## Fan-out
//!
//! `CompositeSink` combines several sinks into one, forwarding every event
//! to each child in registration order before returning. A child failure
//! propagates immediately; later children are not invoked for that event.
//! This is how one decoded event both mutates the live graph and flows to
//! an output encoder in a single pass, mutation always first.

use crate::types::{Attributes, GraphWireError};
use serde::{Deserialize, Serialize};

// =============================================================================
// STREAM EVENT
// =============================================================================

/// One discrete graph change or stream lifecycle marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The stream is open; no events precede this one.
    StreamStart,
    /// The stream is complete; no events follow this one.
    StreamEnd,
    /// A node appeared, with its visible attributes.
    NodeAdded { id: String, attributes: Attributes },
    /// A node disappeared.
    NodeRemoved { id: String },
    /// An edge appeared between two previously announced nodes.
    EdgeAdded {
        id: String,
        source: String,
        target: String,
        directed: bool,
        attributes: Attributes,
    },
    /// An edge disappeared.
    EdgeRemoved { id: String },
    /// The attributes of a node or edge changed.
    AttributesChanged { id: String, attributes: Attributes },
}

// =============================================================================
// OPERATION SINK
// =============================================================================

/// The contract every consumer of decoded graph events implements.
///
/// A sink must observe every event exactly once, in order. It has no
/// identity beyond the request it serves.
pub trait OperationSink {
    /// Consume one event. Errors propagate to whoever drives the stream.
    fn handle(&mut self, event: &StreamEvent) -> Result<(), GraphWireError>;
}

// =============================================================================
// COMPOSITE SINK (fan-out)
// =============================================================================

/// A sink that forwards every event to an ordered sequence of child sinks.
///
/// Forwarding is synchronous and fail-fast: the first child error aborts
/// the event, and children registered after the failing one do not see it.
#[derive(Default)]
pub struct CompositeSink<'a> {
    sinks: Vec<Box<dyn OperationSink + 'a>>,
}

impl<'a> CompositeSink<'a> {
    /// Create an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child sink. Children observe events in registration order.
    pub fn push(&mut self, sink: Box<dyn OperationSink + 'a>) {
        self.sinks.push(sink);
    }

    /// Number of registered children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when no children are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl OperationSink for CompositeSink<'_> {
    fn handle(&mut self, event: &StreamEvent) -> Result<(), GraphWireError> {
        for sink in &mut self.sinks {
            sink.handle(event)?;
        }
        Ok(())
    }
}

// =============================================================================
// BUFFERED SINK
// =============================================================================

/// A sink that records events in arrival order for later replay.
///
/// Useful when a consumer attaches before it is ready to drain, and as the
/// observation point in tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BufferedSink {
    events: Vec<StreamEvent>,
}

impl BufferedSink {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, in arrival order.
    #[must_use]
    pub fn events(&self) -> &[StreamEvent] {
        &self.events
    }

    /// Consume the buffer, yielding the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<StreamEvent> {
        self.events
    }

    /// Forward every recorded event to another sink, in order.
    pub fn replay(&self, sink: &mut dyn OperationSink) -> Result<(), GraphWireError> {
        for event in &self.events {
            sink.handle(event)?;
        }
        Ok(())
    }
}

impl OperationSink for BufferedSink {
    fn handle(&mut self, event: &StreamEvent) -> Result<(), GraphWireError> {
        self.events.push(event.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
