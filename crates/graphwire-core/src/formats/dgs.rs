//! # DGS Codec
//!
//! Line-based text format. One record per line:
//!
//! ```text
//! DGS004
//! an "A" "label":"Alice"
//! an "B"
//! ae "e1" "A" > "B" "weight":2
//! cg "A" "label":"Alicia"
//! de "e1"
//! dn "B"
//! ```
//!
//! The header line opens the stream; end-of-input closes it (the format
//! has no end record). `>` between the endpoints of an `ae` record marks a
//! directed edge. Identifiers and string values are double-quoted with
//! backslash escapes; integers, floats and booleans are bare. Lines that
//! are blank or start with `#` are skipped.

use crate::event::{OperationSink, StreamEvent};
use crate::formats::StreamDecoder;
use crate::primitives::{DGS_HEADER, MAX_LINE_LENGTH};
use crate::types::{AttrValue, Attributes, GraphWireError};
use std::io::{BufRead, Write};

/// Construct a DGS encoder bound to the output stream.
pub fn encoder<'w>(out: &'w mut dyn Write) -> Box<dyn OperationSink + 'w> {
    Box::new(DgsEncoder::new(out))
}

/// Construct a DGS decoder.
pub fn decoder() -> Box<dyn StreamDecoder> {
    Box::new(DgsDecoder)
}

// =============================================================================
// ENCODER
// =============================================================================

/// Writes one DGS record per event. Stream-end flushes the output.
pub struct DgsEncoder<W: Write> {
    out: W,
}

impl<W: Write> DgsEncoder<W> {
    /// Create an encoder writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> OperationSink for DgsEncoder<W> {
    fn handle(&mut self, event: &StreamEvent) -> Result<(), GraphWireError> {
        match event {
            StreamEvent::StreamStart => writeln!(self.out, "{DGS_HEADER}")?,
            StreamEvent::StreamEnd => self.out.flush()?,
            StreamEvent::NodeAdded { id, attributes } => {
                let mut line = format!("an {}", quote(id));
                push_attributes(&mut line, attributes);
                writeln!(self.out, "{line}")?;
            }
            StreamEvent::NodeRemoved { id } => writeln!(self.out, "dn {}", quote(id))?,
            StreamEvent::EdgeAdded {
                id,
                source,
                target,
                directed,
                attributes,
            } => {
                let arrow = if *directed { "> " } else { "" };
                let mut line = format!(
                    "ae {} {} {}{}",
                    quote(id),
                    quote(source),
                    arrow,
                    quote(target)
                );
                push_attributes(&mut line, attributes);
                writeln!(self.out, "{line}")?;
            }
            StreamEvent::EdgeRemoved { id } => writeln!(self.out, "de {}", quote(id))?,
            StreamEvent::AttributesChanged { id, attributes } => {
                let mut line = format!("cg {}", quote(id));
                push_attributes(&mut line, attributes);
                writeln!(self.out, "{line}")?;
            }
        }
        Ok(())
    }
}

fn push_attributes(line: &mut String, attributes: &Attributes) {
    for (title, value) in attributes {
        line.push(' ');
        line.push_str(&quote(title));
        line.push(':');
        line.push_str(&format_value(value));
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn format_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Int(i) => i.to_string(),
        // Debug keeps the decimal point, so floats reparse as floats.
        AttrValue::Float(f) => format!("{f:?}"),
        AttrValue::Bool(b) => b.to_string(),
        AttrValue::Str(s) => quote(s),
    }
}

// =============================================================================
// DECODER
// =============================================================================

/// Parses DGS records line by line, forwarding one event per record.
pub struct DgsDecoder;

impl StreamDecoder for DgsDecoder {
    fn decode(
        &mut self,
        input: &mut dyn BufRead,
        sink: &mut dyn OperationSink,
    ) -> Result<(), GraphWireError> {
        let mut line = String::new();
        let mut line_no = 0;
        let mut header_seen = false;
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            if line.len() > MAX_LINE_LENGTH {
                return Err(parse_error(line_no, "line exceeds length limit"));
            }
            let record = line.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }
            if !header_seen {
                if record != DGS_HEADER {
                    return Err(parse_error(line_no, "expected DGS header"));
                }
                header_seen = true;
                sink.handle(&StreamEvent::StreamStart)?;
                continue;
            }
            let event = parse_record(record, line_no)?;
            sink.handle(&event)?;
        }
        if header_seen {
            sink.handle(&StreamEvent::StreamEnd)?;
        }
        Ok(())
    }
}

fn parse_record(record: &str, line_no: usize) -> Result<StreamEvent, GraphWireError> {
    let mut lexer = Lexer::new(record, line_no);
    let Some(Token::Atom(op)) = lexer.next_token()? else {
        return Err(parse_error(line_no, "expected record type"));
    };
    match op.as_str() {
        "an" => {
            let id = expect_name(&mut lexer)?;
            let attributes = parse_attributes(&mut lexer)?;
            Ok(StreamEvent::NodeAdded { id, attributes })
        }
        "dn" => {
            let id = expect_name(&mut lexer)?;
            expect_end(&mut lexer)?;
            Ok(StreamEvent::NodeRemoved { id })
        }
        "ae" => {
            let id = expect_name(&mut lexer)?;
            let source = expect_name(&mut lexer)?;
            let (directed, target) = match lexer.next_token()? {
                Some(Token::Gt) => (true, expect_name(&mut lexer)?),
                Some(Token::Atom(name) | Token::Quoted(name)) => (false, name),
                _ => return Err(parse_error(line_no, "expected edge target")),
            };
            let attributes = parse_attributes(&mut lexer)?;
            Ok(StreamEvent::EdgeAdded {
                id,
                source,
                target,
                directed,
                attributes,
            })
        }
        "de" => {
            let id = expect_name(&mut lexer)?;
            expect_end(&mut lexer)?;
            Ok(StreamEvent::EdgeRemoved { id })
        }
        "cg" => {
            let id = expect_name(&mut lexer)?;
            let attributes = parse_attributes(&mut lexer)?;
            Ok(StreamEvent::AttributesChanged { id, attributes })
        }
        other => Err(parse_error(line_no, &format!("unknown record type {other:?}"))),
    }
}

fn expect_name(lexer: &mut Lexer<'_>) -> Result<String, GraphWireError> {
    match lexer.next_token()? {
        Some(Token::Atom(name) | Token::Quoted(name)) => Ok(name),
        _ => Err(parse_error(lexer.line, "expected identifier")),
    }
}

fn expect_end(lexer: &mut Lexer<'_>) -> Result<(), GraphWireError> {
    match lexer.next_token()? {
        None => Ok(()),
        Some(_) => Err(parse_error(lexer.line, "unexpected trailing token")),
    }
}

fn parse_attributes(lexer: &mut Lexer<'_>) -> Result<Attributes, GraphWireError> {
    let mut attributes = Attributes::new();
    loop {
        let title = match lexer.next_token()? {
            None => return Ok(attributes),
            Some(Token::Atom(title) | Token::Quoted(title)) => title,
            Some(_) => return Err(parse_error(lexer.line, "expected attribute name")),
        };
        if !matches!(lexer.next_token()?, Some(Token::Colon)) {
            return Err(parse_error(lexer.line, "expected ':' after attribute name"));
        }
        let value = match lexer.next_token()? {
            Some(Token::Quoted(s)) => AttrValue::Str(s),
            Some(Token::Atom(word)) => classify_scalar(&word),
            _ => return Err(parse_error(lexer.line, "expected attribute value")),
        };
        attributes.insert(title, value);
    }
}

/// A bare word is a boolean, an integer, a float, or failing all of those
/// a plain string.
fn classify_scalar(word: &str) -> AttrValue {
    match word {
        "true" => return AttrValue::Bool(true),
        "false" => return AttrValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = word.parse::<i64>() {
        return AttrValue::Int(i);
    }
    if let Ok(f) = word.parse::<f64>() {
        return AttrValue::Float(f);
    }
    AttrValue::Str(word.to_string())
}

fn parse_error(line: usize, message: &str) -> GraphWireError {
    GraphWireError::Parse {
        line,
        message: message.to_string(),
    }
}

// =============================================================================
// LEXER
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Atom(String),
    Quoted(String),
    Colon,
    Gt,
}

struct Lexer<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(record: &'a str, line: usize) -> Self {
        Self { rest: record, line }
    }

    fn next_token(&mut self) -> Result<Option<Token>, GraphWireError> {
        self.rest = self.rest.trim_start();
        let mut chars = self.rest.char_indices();
        let Some((_, first)) = chars.next() else {
            return Ok(None);
        };
        match first {
            ':' => {
                self.rest = &self.rest[1..];
                Ok(Some(Token::Colon))
            }
            '>' => {
                self.rest = &self.rest[1..];
                Ok(Some(Token::Gt))
            }
            '"' => {
                let mut value = String::new();
                let mut escaped = false;
                for (i, c) in chars {
                    if escaped {
                        value.push(match c {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        self.rest = &self.rest[i + 1..];
                        return Ok(Some(Token::Quoted(value)));
                    } else {
                        value.push(c);
                    }
                }
                Err(parse_error(self.line, "unterminated string"))
            }
            _ => {
                let end = self
                    .rest
                    .find(|c: char| c.is_whitespace() || matches!(c, ':' | '>' | '"'))
                    .unwrap_or(self.rest.len());
                let atom = self.rest[..end].to_string();
                self.rest = &self.rest[end..];
                Ok(Some(Token::Atom(atom)))
            }
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
    use std::io::Cursor;

    fn encode(events: &[StreamEvent]) -> String {
        let mut out: Vec<u8> = Vec::new();
        {
            let mut enc = DgsEncoder::new(&mut out);
            for event in events {
                enc.handle(event).expect("encode");
            }
        }
        String::from_utf8(out).expect("utf8")
    }

    fn decode(text: &str) -> Result<Vec<StreamEvent>, GraphWireError> {
        let mut sink = BufferedSink::new();
        DgsDecoder.decode(&mut Cursor::new(text.as_bytes()), &mut sink)?;
        Ok(sink.into_events())
    }

    fn node_added(id: &str, attributes: Attributes) -> StreamEvent {
        StreamEvent::NodeAdded {
            id: id.to_string(),
            attributes,
        }
    }

    #[test]
    fn encodes_header_and_records() {
        let mut attributes = Attributes::new();
        attributes.insert("label".to_string(), AttrValue::from("Alice"));

        let text = encode(&[
            StreamEvent::StreamStart,
            node_added("A", attributes),
            StreamEvent::EdgeAdded {
                id: "e1".to_string(),
                source: "A".to_string(),
                target: "B".to_string(),
                directed: true,
                attributes: Attributes::new(),
            },
            StreamEvent::StreamEnd,
        ]);

        assert_eq!(
            text,
            "DGS004\nan \"A\" \"label\":\"Alice\"\nae \"e1\" \"A\" > \"B\"\n"
        );
    }

    #[test]
    fn decode_reproduces_events_with_framing() {
        let text = "DGS004\nan \"X\"\nan \"Y\"\nae \"e1\" \"X\" > \"Y\"\n";
        let events = decode(text).expect("decode");

        assert_eq!(events.len(), 5);
        assert_eq!(events[0], StreamEvent::StreamStart);
        assert_eq!(events[4], StreamEvent::StreamEnd);
        assert!(matches!(
            &events[3],
            StreamEvent::EdgeAdded { directed: true, .. }
        ));
    }

    #[test]
    fn undirected_edge_has_no_arrow() {
        let text = encode(&[StreamEvent::EdgeAdded {
            id: "e1".to_string(),
            source: "A".to_string(),
            target: "B".to_string(),
            directed: false,
            attributes: Attributes::new(),
        }]);
        assert_eq!(text, "ae \"e1\" \"A\" \"B\"\n");

        let events = decode("DGS004\nae \"e1\" \"A\" \"B\"\n").expect("decode");
        assert!(matches!(
            &events[1],
            StreamEvent::EdgeAdded {
                directed: false,
                ..
            }
        ));
    }

    #[test]
    fn scalar_classification() {
        let events =
            decode("DGS004\nan \"A\" \"i\":3 \"f\":1.5 \"b\":true \"s\":\"x\" \"w\":bare\n")
                .expect("decode");
        let StreamEvent::NodeAdded { attributes, .. } = &events[1] else {
            unreachable!("node added expected");
        };

        assert_eq!(attributes.get("i"), Some(&AttrValue::Int(3)));
        assert_eq!(attributes.get("f"), Some(&AttrValue::Float(1.5)));
        assert_eq!(attributes.get("b"), Some(&AttrValue::Bool(true)));
        assert_eq!(attributes.get("s"), Some(&AttrValue::from("x")));
        assert_eq!(attributes.get("w"), Some(&AttrValue::from("bare")));
    }

    #[test]
    fn event_roundtrip_preserves_escapes_and_types() {
        let mut attributes = Attributes::new();
        attributes.insert("note".to_string(), AttrValue::from("say \"hi\"\nback\\slash"));
        attributes.insert("n".to_string(), AttrValue::Float(2.0));
        let original = vec![
            StreamEvent::StreamStart,
            node_added("weird id", attributes),
            StreamEvent::AttributesChanged {
                id: "weird id".to_string(),
                attributes: [("n".to_string(), AttrValue::Int(7))].into(),
            },
            StreamEvent::NodeRemoved {
                id: "weird id".to_string(),
            },
            StreamEvent::StreamEnd,
        ];

        let decoded = decode(&encode(&original)).expect("roundtrip");

        assert_eq!(decoded, original);
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let events = decode("DGS004\n\n# a comment\nan \"A\"\n").expect("decode");
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn missing_header_is_a_parse_error() {
        let err = decode("an \"A\"\n").expect_err("no header");
        assert!(matches!(err, GraphWireError::Parse { line: 1, .. }));
    }

    #[test]
    fn malformed_records_carry_line_numbers() {
        let err = decode("DGS004\nan \"A\"\nxx \"A\"\n").expect_err("unknown op");
        assert!(matches!(err, GraphWireError::Parse { line: 3, .. }));

        let err = decode("DGS004\nan \"A\" \"k\" 1\n").expect_err("missing colon");
        assert!(matches!(err, GraphWireError::Parse { line: 2, .. }));

        let err = decode("DGS004\nan \"unterminated\n").expect_err("unterminated");
        assert!(matches!(err, GraphWireError::Parse { line: 2, .. }));
    }

    #[test]
    fn empty_input_produces_no_events() {
        let events = decode("").expect("empty");
        assert!(events.is_empty());
    }
}
