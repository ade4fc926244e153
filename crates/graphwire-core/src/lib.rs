//! # graphwire-core
//!
//! The operation-execution core of graphwire - THE LOGIC.
//!
//! graphwire exposes a live, mutable graph to remote clients through a
//! pluggable streaming protocol: snapshot the whole graph, fetch a single
//! node or edge, or push a stream of mutation events that are applied to
//! the graph and simultaneously re-broadcast to attached observers.
//!
//! This crate mediates between:
//! - the shared, concurrently-accessed graph (`SharedGraph`),
//! - format-specific stream codecs resolved via `FormatRegistry`,
//! - operation sinks that must each observe every mutation exactly once,
//!   in order (`OperationSink`, fanned out via `CompositeSink`).
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust); the transport layer
//!   lives in the application binary
//! - The graph is the only resource shared across request contexts
//! - Events are ephemeral: nothing is persisted beyond the graph itself

// =============================================================================
// MODULES
// =============================================================================

pub mod applier;
pub mod event;
pub mod executor;
pub mod formats;
pub mod graph;
pub mod primitives;
pub mod projector;
pub mod snapshot;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AttrCell, AttrColumn, AttrValue, AttributeRow, Attributes, EdgeVisual, GraphWireError,
    NodeVisual,
};

// =============================================================================
// RE-EXPORTS: Events & Sinks
// =============================================================================

pub use event::{BufferedSink, CompositeSink, OperationSink, StreamEvent};

// =============================================================================
// RE-EXPORTS: Graph & Operations
// =============================================================================

pub use applier::GraphUpdater;
pub use executor::OperationExecutor;
pub use graph::{Edge, Graph, Node, SharedGraph};

// =============================================================================
// RE-EXPORTS: Formats
// =============================================================================

pub use formats::{DecoderCtor, EncoderCtor, FormatRegistry, StreamDecoder};
