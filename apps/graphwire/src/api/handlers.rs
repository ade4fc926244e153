//! # API Endpoint Handlers
//!
//! The stream endpoints buffer the operation output in memory: the core
//! runs synchronously under `spawn_blocking`, and the finished byte stream
//! becomes the response body. Graph locks are therefore never held across
//! network I/O.

use super::{
    AppState,
    types::{ErrorResponse, FormatQuery, HealthResponse, StatusResponse, fault_status},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use graphwire_core::GraphWireError;
use std::io::Cursor;
use std::sync::Arc;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get node and edge counts plus the registered export formats.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (node_count, edge_count) = {
        let g = state.executor.graph().read();
        (g.node_count(), g.edge_count())
    };

    let response = StatusResponse {
        node_count,
        edge_count,
        formats: state.formats.clone(),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// STREAM HANDLERS
// =============================================================================

/// Export the whole graph as a snapshot stream.
///
/// The executor leaves the stream open for live-feed composition; this
/// transport takes the snapshot only and closes the stream by dropping
/// the encoder.
pub async fn graph_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Response {
    let executor = Arc::clone(&state.executor);
    let result = tokio::task::spawn_blocking(move || {
        let mut out: Vec<u8> = Vec::new();
        executor.export_graph(&query.format, &mut out).map(drop)?;
        Ok((query.format, out))
    })
    .await;
    stream_response(result)
}

/// Export a single node. An absent identifier yields a framing-only
/// stream, not an error.
pub async fn node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FormatQuery>,
) -> Response {
    let executor = Arc::clone(&state.executor);
    let result = tokio::task::spawn_blocking(move || {
        let mut out: Vec<u8> = Vec::new();
        executor.export_node(&query.format, &id, &mut out)?;
        Ok((query.format, out))
    })
    .await;
    stream_response(result)
}

/// Export a single edge, same shape as the node endpoint.
pub async fn edge_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FormatQuery>,
) -> Response {
    let executor = Arc::clone(&state.executor);
    let result = tokio::task::spawn_blocking(move || {
        let mut out: Vec<u8> = Vec::new();
        executor.export_edge(&query.format, &id, &mut out)?;
        Ok((query.format, out))
    })
    .await;
    stream_response(result)
}

/// Ingest an update stream; the response body is the echoed event stream.
///
/// A mid-stream fault aborts the request, but the event prefix decoded
/// before the fault remains applied to the graph.
pub async fn update_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    body: Bytes,
) -> Response {
    let executor = Arc::clone(&state.executor);
    let result = tokio::task::spawn_blocking(move || {
        let mut out: Vec<u8> = Vec::new();
        executor.update_graph(&query.format, &mut Cursor::new(body), &mut out)?;
        Ok((query.format, out))
    })
    .await;
    stream_response(result)
}

// =============================================================================
// RESPONSE ASSEMBLY
// =============================================================================

type StreamResult = Result<Result<(String, Vec<u8>), GraphWireError>, tokio::task::JoinError>;

fn stream_response(result: StreamResult) -> Response {
    match result {
        Ok(Ok((format, bytes))) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type(&format))],
            bytes,
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::warn!("stream operation failed: {}", e);
            (
                fault_status(&e),
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("stream task panicked or was cancelled: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("stream task failed")),
            )
                .into_response()
        }
    }
}

fn content_type(format: &str) -> &'static str {
    match format {
        "json" => "application/x-ndjson",
        _ => "text/plain; charset=utf-8",
    }
}
