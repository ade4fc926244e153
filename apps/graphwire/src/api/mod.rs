//! # graphwire HTTP API Module
//!
//! This module implements the HTTP transport over the core executor.
//!
//! ## Endpoints
//!
//! - `GET /graph?format=F` - Export the whole graph as a snapshot stream
//! - `GET /graph/node/{id}?format=F` - Export a single node
//! - `GET /graph/edge/{id}?format=F` - Export a single edge
//! - `POST /graph/update?format=F` - Ingest an update stream, echoing
//!   applied events in the response body
//! - `GET /status` - Node/edge counts and registered formats
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `GRAPHWIRE_CORS_ORIGINS`: Comma-separated list of allowed origins, or
//!   "*" for all (default: localhost only)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `graphwire::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    edge_handler, graph_handler, health_handler, node_handler, status_handler, update_handler,
};
#[allow(unused_imports)]
pub use types::{ErrorResponse, FormatQuery, HealthResponse, StatusResponse, fault_status};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use graphwire_core::{GraphWireError, OperationExecutor};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the executor plus a few values computed once.
#[derive(Clone)]
pub struct AppState {
    /// The per-request operation orchestrator over the shared graph.
    pub executor: Arc<OperationExecutor>,
    /// Encoder format keys, collected at construction time.
    pub formats: Vec<String>,
}

impl AppState {
    /// Create new app state around an executor.
    #[must_use]
    pub fn new(executor: OperationExecutor) -> Self {
        let formats = executor.registry().encoder_keys().map(String::from).collect();
        Self {
            executor: Arc::new(executor),
            formats,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `GRAPHWIRE_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("GRAPHWIRE_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (GRAPHWIRE_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in GRAPHWIRE_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No GRAPHWIRE_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit - bounds update stream size
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/graph", get(handlers::graph_handler))
        .route("/graph/node/{id}", get(handlers::node_handler))
        .route("/graph/edge/{id}", get(handlers::edge_handler))
        .route("/graph/update", post(handlers::update_handler))
        .layer(axum::extract::DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, executor: OperationExecutor) -> Result<(), GraphWireError> {
    let state = AppState::new(executor);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("graphwire HTTP server listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
