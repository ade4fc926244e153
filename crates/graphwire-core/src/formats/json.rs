//! # JSON Lines Codec
//!
//! One JSON object per line, tagged by event kind:
//!
//! ```text
//! {"event":"stream_start"}
//! {"event":"node_added","id":"A","attributes":{"label":"Alice"}}
//! {"event":"stream_end"}
//! ```
//!
//! Unlike DGS, framing is explicit: stream-start and stream-end travel as
//! ordinary lines, and the decoder forwards exactly what the input
//! contains.

use crate::event::{OperationSink, StreamEvent};
use crate::formats::StreamDecoder;
use crate::primitives::MAX_LINE_LENGTH;
use crate::types::GraphWireError;
use std::io::{BufRead, Write};

/// Construct a JSON encoder bound to the output stream.
pub fn encoder<'w>(out: &'w mut dyn Write) -> Box<dyn OperationSink + 'w> {
    Box::new(JsonEncoder::new(out))
}

/// Construct a JSON decoder.
pub fn decoder() -> Box<dyn StreamDecoder> {
    Box::new(JsonDecoder)
}

// =============================================================================
// ENCODER
// =============================================================================

/// Writes one JSON line per event. Stream-end flushes the output after
/// writing its own line.
pub struct JsonEncoder<W: Write> {
    out: W,
}

impl<W: Write> JsonEncoder<W> {
    /// Create an encoder writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> OperationSink for JsonEncoder<W> {
    fn handle(&mut self, event: &StreamEvent) -> Result<(), GraphWireError> {
        let line = serde_json::to_string(event)
            .map_err(|e| GraphWireError::Parse {
                line: 0,
                message: format!("event not representable as JSON: {e}"),
            })?;
        writeln!(self.out, "{line}")?;
        if matches!(event, StreamEvent::StreamEnd) {
            self.out.flush()?;
        }
        Ok(())
    }
}

// =============================================================================
// DECODER
// =============================================================================

/// Parses one JSON event per line, skipping blank lines.
pub struct JsonDecoder;

impl StreamDecoder for JsonDecoder {
    fn decode(
        &mut self,
        input: &mut dyn BufRead,
        sink: &mut dyn OperationSink,
    ) -> Result<(), GraphWireError> {
        let mut line = String::new();
        let mut line_no = 0;
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            line_no += 1;
            if line.len() > MAX_LINE_LENGTH {
                return Err(GraphWireError::Parse {
                    line: line_no,
                    message: "line exceeds length limit".to_string(),
                });
            }
            let record = line.trim();
            if record.is_empty() {
                continue;
            }
            let event: StreamEvent =
                serde_json::from_str(record).map_err(|e| GraphWireError::Parse {
                    line: line_no,
                    message: e.to_string(),
                })?;
            sink.handle(&event)?;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BufferedSink;
    use crate::types::{AttrValue, Attributes};
    use std::io::Cursor;

    fn decode(text: &str) -> Result<Vec<StreamEvent>, GraphWireError> {
        let mut sink = BufferedSink::new();
        JsonDecoder.decode(&mut Cursor::new(text.as_bytes()), &mut sink)?;
        Ok(sink.into_events())
    }

    #[test]
    fn event_roundtrip_through_lines() {
        let mut attributes = Attributes::new();
        attributes.insert("label".to_string(), AttrValue::from("Alice"));
        attributes.insert("age".to_string(), AttrValue::Int(30));
        let original = vec![
            StreamEvent::StreamStart,
            StreamEvent::NodeAdded {
                id: "A".to_string(),
                attributes,
            },
            StreamEvent::EdgeAdded {
                id: "e1".to_string(),
                source: "A".to_string(),
                target: "A".to_string(),
                directed: false,
                attributes: Attributes::new(),
            },
            StreamEvent::StreamEnd,
        ];

        let mut out: Vec<u8> = Vec::new();
        {
            let mut enc = JsonEncoder::new(&mut out);
            for event in &original {
                enc.handle(event).expect("encode");
            }
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 4);

        let decoded = decode(&text).expect("decode");
        assert_eq!(decoded, original);
    }

    #[test]
    fn malformed_line_fails_with_line_number() {
        let text = "{\"event\":\"stream_start\"}\nnot json\n";
        let err = decode(text).expect_err("malformed");
        assert!(matches!(err, GraphWireError::Parse { line: 2, .. }));
    }

    #[test]
    fn blank_lines_skipped() {
        let text = "{\"event\":\"stream_start\"}\n\n{\"event\":\"stream_end\"}\n";
        let decoded = decode(text).expect("decode");
        assert_eq!(
            decoded,
            vec![StreamEvent::StreamStart, StreamEvent::StreamEnd]
        );
    }
}
