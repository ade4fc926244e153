//! # Wire Formats
//!
//! Format-specific translators between stream events and their byte-level
//! wire representation, resolved through an explicit registry.
//!
//! An encoder is an `OperationSink` bound to an output stream: framing is
//! produced by the stream-start / stream-end events it consumes, and
//! stream-end flushes. A decoder consumes an input stream fully, driving a
//! sink once per decoded event.
//!
//! `FormatRegistry` maps a format key to constructor functions and is
//! injected into the executor at construction time. There is no ambient
//! global lookup: what is not registered does not exist, and an unknown
//! key fails the request before any I/O.

pub mod dgs;
pub mod json;

use crate::event::OperationSink;
use crate::primitives::{FORMAT_DGS, FORMAT_JSON};
use crate::types::GraphWireError;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

// =============================================================================
// DECODER CONTRACT
// =============================================================================

/// A format-specific stream decoder.
pub trait StreamDecoder {
    /// Consume the entire input stream, forwarding one call per decoded
    /// event to the sink. The first error — parse, I/O or sink — aborts
    /// decoding and propagates.
    fn decode(
        &mut self,
        input: &mut dyn BufRead,
        sink: &mut dyn OperationSink,
    ) -> Result<(), GraphWireError>;
}

// =============================================================================
// FORMAT REGISTRY
// =============================================================================

/// Constructor for an encoder bound to an output stream.
pub type EncoderCtor = for<'w> fn(&'w mut dyn Write) -> Box<dyn OperationSink + 'w>;

/// Constructor for a decoder.
pub type DecoderCtor = fn() -> Box<dyn StreamDecoder>;

/// Two independent registries mapping a format key to encoder and decoder
/// constructors. A format may register either side or both.
#[derive(Default)]
pub struct FormatRegistry {
    encoders: BTreeMap<String, EncoderCtor>,
    decoders: BTreeMap<String, DecoderCtor>,
}

impl FormatRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `dgs` and `json` codecs.
    #[must_use]
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        registry.register_encoder(FORMAT_DGS, dgs::encoder);
        registry.register_decoder(FORMAT_DGS, dgs::decoder);
        registry.register_encoder(FORMAT_JSON, json::encoder);
        registry.register_decoder(FORMAT_JSON, json::decoder);
        registry
    }

    /// Register an encoder constructor under a format key.
    pub fn register_encoder(&mut self, key: &str, ctor: EncoderCtor) {
        self.encoders.insert(key.to_string(), ctor);
    }

    /// Register a decoder constructor under a format key.
    pub fn register_decoder(&mut self, key: &str, ctor: DecoderCtor) {
        self.decoders.insert(key.to_string(), ctor);
    }

    /// Construct an encoder for the format key, bound to the output
    /// stream. Fails with `UnknownFormat` before any byte is written.
    pub fn encoder<'w>(
        &self,
        key: &str,
        out: &'w mut dyn Write,
    ) -> Result<Box<dyn OperationSink + 'w>, GraphWireError> {
        let ctor = self
            .encoders
            .get(key)
            .ok_or_else(|| GraphWireError::UnknownFormat(key.to_string()))?;
        Ok(ctor(out))
    }

    /// Construct a decoder for the format key.
    pub fn decoder(&self, key: &str) -> Result<Box<dyn StreamDecoder>, GraphWireError> {
        let ctor = self
            .decoders
            .get(key)
            .ok_or_else(|| GraphWireError::UnknownFormat(key.to_string()))?;
        Ok(ctor())
    }

    /// Keys with a registered encoder.
    pub fn encoder_keys(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    /// Keys with a registered decoder.
    pub fn decoder_keys(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }
}

// =============================================================================
// TESTS
// =============================================================================
