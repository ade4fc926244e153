//! Integration tests for the offline CLI commands.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use graphwire::cli::{cmd_convert, cmd_formats};
use graphwire_core::GraphWireError;
use std::fs;

#[test]
fn convert_dgs_to_json_roundtrips_the_graph() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.dgs");
    let output = dir.path().join("graph.jsonl");
    fs::write(
        &input,
        "DGS004\nan \"A\" \"label\":\"Alice\"\nan \"B\"\nae \"e1\" \"A\" > \"B\"\n",
    )
    .unwrap();

    cmd_convert(&input, "dgs", &output, "json", false).expect("convert");

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // start, two nodes, one edge, end
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "{\"event\":\"stream_start\"}");
    assert!(lines[1].contains("\"label\":\"Alice\""));
    assert!(lines[3].contains("\"directed\":true"));
    assert_eq!(lines[4], "{\"event\":\"stream_end\"}");
}

#[test]
fn convert_with_viz_adds_visualization_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.dgs");
    let output = dir.path().join("graph.jsonl");
    fs::write(&input, "DGS004\nan \"A\"\n").unwrap();

    cmd_convert(&input, "dgs", &output, "json", true).expect("convert");

    let text = fs::read_to_string(&output).unwrap();
    for key in ["\"x\":", "\"y\":", "\"z\":", "\"size\":"] {
        assert!(text.contains(key), "missing viz key {key}");
    }
}

#[test]
fn convert_rejects_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.dgs");
    let output = dir.path().join("out.jsonl");
    fs::write(&input, "DGS004\nan \"A\"\nzz nonsense\n").unwrap();

    let err = cmd_convert(&input, "dgs", &output, "json", false).expect_err("malformed");
    assert!(matches!(err, GraphWireError::Parse { line: 3, .. }));
}

#[test]
fn convert_rejects_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.dgs");
    let output = dir.path().join("out.xml");
    fs::write(&input, "DGS004\n").unwrap();

    let err = cmd_convert(&input, "dgs", &output, "graphml", false).expect_err("unknown");
    assert!(matches!(err, GraphWireError::UnknownFormat(_)));
}

#[test]
fn formats_command_lists_builtins() {
    cmd_formats().expect("formats");
}
