//! # API Request/Response Types
//!
//! JSON structures for the control endpoints, the format query parameter,
//! and the mapping from core faults to HTTP status codes.

use axum::http::StatusCode;
use graphwire_core::GraphWireError;
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Graph status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub node_count: usize,
    pub edge_count: usize,
    /// Format keys with a registered encoder.
    pub formats: Vec<String>,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error payload returned for failed stream operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Wrap an error message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

/// The `format` query parameter shared by all stream endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatQuery {
    /// Wire format key; defaults to the JSON-lines codec.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

// =============================================================================
// FAULT MAPPING
// =============================================================================

/// Translate a core fault into the client-visible status code.
///
/// - unknown format: the request never reached any I/O, 400
/// - malformed stream / invalid mutation: the input was at fault, 422
///   (whatever event prefix was applied before the fault stays applied)
/// - everything else: 500
#[must_use]
pub fn fault_status(err: &GraphWireError) -> StatusCode {
    match err {
        GraphWireError::UnknownFormat(_) => StatusCode::BAD_REQUEST,
        GraphWireError::Parse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_invalid_mutation() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_status_mapping() {
        assert_eq!(
            fault_status(&GraphWireError::UnknownFormat("graphml".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            fault_status(&GraphWireError::Parse {
                line: 3,
                message: "bad".into()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            fault_status(&GraphWireError::DuplicateNode("A".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            fault_status(&GraphWireError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
