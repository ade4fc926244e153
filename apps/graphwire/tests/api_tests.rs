//! Integration tests for the graphwire HTTP API.
//!
//! Uses axum-test to exercise the API handlers without starting a real
//! server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use graphwire::api::{AppState, HealthResponse, StatusResponse, create_router};
use graphwire_core::{
    AttrValue, Attributes, FormatRegistry, OperationExecutor, SharedGraph,
};
use std::sync::Arc;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn executor() -> OperationExecutor {
    OperationExecutor::new(
        SharedGraph::new(),
        Arc::new(FormatRegistry::with_builtin_formats()),
    )
}

/// Create a test server over a fresh empty graph.
fn create_test_server() -> TestServer {
    TestServer::new(create_router(AppState::new(executor()))).unwrap()
}

/// Create a test server with viz data disabled and some pre-populated data.
fn create_populated_test_server() -> TestServer {
    let exec = executor().with_viz_data(false);
    {
        let mut g = exec.graph().write();
        let mut attributes = Attributes::new();
        attributes.insert("label".to_string(), AttrValue::from("Alice"));
        g.add_node("A", &attributes).expect("add");
        g.add_node("B", &Attributes::new()).expect("add");
        g.add_edge("e1", "A", "B", true, &Attributes::new())
            .expect("edge");
    }
    TestServer::new(create_router(AppState::new(exec))).unwrap()
}

// =============================================================================
// HEALTH & STATUS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_status_reports_counts_and_formats() {
    let server = create_populated_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.node_count, 2);
    assert_eq!(status.edge_count, 1);
    assert_eq!(status.formats, vec!["dgs".to_string(), "json".to_string()]);
}

// =============================================================================
// EXPORT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_export_empty_graph_is_start_only() {
    let server = create_test_server();

    let response = server.get("/graph").add_query_param("format", "json").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "{\"event\":\"stream_start\"}\n");
}

#[tokio::test]
async fn test_export_graph_dgs_snapshot() {
    let server = create_populated_test_server();

    let response = server.get("/graph").add_query_param("format", "dgs").await;

    response.assert_status_ok();
    let text = response.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "DGS004",
            "an \"A\" \"label\":\"Alice\"",
            "an \"B\"",
            "ae \"e1\" \"A\" > \"B\"",
        ]
    );
}

#[tokio::test]
async fn test_export_single_node() {
    let server = create_populated_test_server();

    let response = server
        .get("/graph/node/A")
        .add_query_param("format", "json")
        .await;

    response.assert_status_ok();
    let text = response.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "{\"event\":\"stream_start\"}");
    assert!(lines[1].contains("\"node_added\""));
    assert!(lines[1].contains("\"label\":\"Alice\""));
    assert_eq!(lines[2], "{\"event\":\"stream_end\"}");
}

#[tokio::test]
async fn test_export_missing_node_is_framing_only() {
    let server = create_populated_test_server();

    let response = server
        .get("/graph/node/ghost")
        .add_query_param("format", "json")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "{\"event\":\"stream_start\"}\n{\"event\":\"stream_end\"}\n"
    );
}

#[tokio::test]
async fn test_export_single_edge_carries_direction() {
    let server = create_populated_test_server();

    let response = server
        .get("/graph/edge/e1")
        .add_query_param("format", "dgs")
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "DGS004\nae \"e1\" \"A\" > \"B\"\n");
}

#[tokio::test]
async fn test_unknown_format_is_bad_request() {
    let server = create_test_server();

    let response = server
        .get("/graph")
        .add_query_param("format", "graphml")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("graphml"));
}

// =============================================================================
// UPDATE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_update_applies_and_echoes() {
    let server = create_test_server();
    let body = "DGS004\nan \"X\"\nan \"Y\"\nae \"e1\" \"X\" > \"Y\"\n";

    let response = server
        .post("/graph/update")
        .add_query_param("format", "dgs")
        .text(body)
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), body);

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.node_count, 2);
    assert_eq!(status.edge_count, 1);
}

#[tokio::test]
async fn test_malformed_update_keeps_applied_prefix() {
    let server = create_test_server();
    let body = "DGS004\nan \"X\"\nnot a record\n";

    let response = server
        .post("/graph/update")
        .add_query_param("format", "dgs")
        .text(body)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // The prefix decoded before the fault remains applied.
    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.node_count, 1);
}

#[tokio::test]
async fn test_dangling_edge_update_is_invalid_mutation() {
    let server = create_test_server();
    let body = "DGS004\nan \"X\"\nan \"Y\"\nae \"e2\" \"X\" > \"Z\"\n";

    let response = server
        .post("/graph/update")
        .add_query_param("format", "dgs")
        .text(body)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("missing node"));

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.node_count, 2);
    assert_eq!(status.edge_count, 0);
}

#[tokio::test]
async fn test_update_then_roundtrip_export() {
    let server = create_test_server();
    let body = "{\"event\":\"node_added\",\"id\":\"N\",\"attributes\":{\"label\":\"node\"}}\n";

    server
        .post("/graph/update")
        .add_query_param("format", "json")
        .text(body)
        .await
        .assert_status_ok();

    let response = server
        .get("/graph/node/N")
        .add_query_param("format", "json")
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("\"label\":\"node\""));
}
