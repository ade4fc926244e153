//! # graphwire - Graph Streaming Server
//!
//! The main binary for the graphwire streaming substrate.
//!
//! This application provides:
//! - HTTP API server (axum-based) exposing the four stream operations
//! - CLI interface for serving and offline stream conversion
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/graphwire (THE BINARY)            │
//! │                                                      │
//! │   ┌─────────────┐            ┌─────────────┐         │
//! │   │   CLI       │            │   HTTP API  │         │
//! │   │  (clap)     │            │   (axum)    │         │
//! │   └──────┬──────┘            └──────┬──────┘         │
//! │          │                          │                │
//! │          └────────────┬─────────────┘                │
//! │                       ▼                              │
//! │              ┌─────────────────┐                     │
//! │              │ graphwire-core  │                     │
//! │              │  (THE LOGIC)    │                     │
//! │              └─────────────────┘                     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server, seeding the graph from a DGS file
//! graphwire serve --host 0.0.0.0 --port 8080 --load graph.dgs
//!
//! # Offline stream conversion
//! graphwire convert --input graph.dgs --from dgs --output graph.jsonl --to json
//! ```

use clap::Parser;
use graphwire::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — GRAPHWIRE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GRAPHWIRE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "graphwire=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the graphwire startup banner.
fn print_banner() {
    println!(
        r#"
  graphwire v{}

  live graphs over the wire - snapshot | fetch | stream
"#,
        env!("CARGO_PKG_VERSION")
    );
}
