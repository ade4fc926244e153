//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use graphwire_core::{
    FormatRegistry, GraphWireError, OperationExecutor, SharedGraph, StreamEvent,
};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for stream ingestion (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_STREAM_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), GraphWireError> {
    let metadata = std::fs::metadata(path)?;

    if metadata.len() > max_size {
        return Err(GraphWireError::Io(std::io::Error::other(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        ))));
    }
    Ok(())
}

/// Validate an input file path: canonicalize to resolve symlinks and "..",
/// ensure it exists and is a regular file.
fn validate_input_path(path: &Path) -> Result<PathBuf, GraphWireError> {
    let canonical = path.canonicalize().map_err(|e| {
        GraphWireError::Io(std::io::Error::new(
            e.kind(),
            format!("Invalid file path '{}': {}", path.display(), e),
        ))
    })?;

    if !canonical.is_file() {
        return Err(GraphWireError::Io(std::io::Error::other(format!(
            "Path '{}' is not a regular file",
            path.display()
        ))));
    }

    Ok(canonical)
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, GraphWireError> {
    let parent = path.parent().unwrap_or(Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        GraphWireError::Io(std::io::Error::new(
            e.kind(),
            format!("Invalid output directory '{}': {}", parent.display(), e),
        ))
    })?;

    let filename = path.file_name().ok_or_else(|| {
        GraphWireError::Io(std::io::Error::other("Output path has no filename"))
    })?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server, optionally seeding the graph from a stream file.
pub async fn cmd_serve(
    host: &str,
    port: u16,
    load: Option<&Path>,
    load_format: &str,
    no_viz: bool,
    no_echo: bool,
) -> Result<(), GraphWireError> {
    let graph = SharedGraph::new();
    let registry = Arc::new(FormatRegistry::with_builtin_formats());

    if let Some(path) = load {
        let loader =
            OperationExecutor::new(graph.clone(), Arc::clone(&registry)).with_echo(false);
        seed_graph(&loader, path, load_format)?;
        let g = graph.read();
        tracing::info!(
            "seeded graph from {}: {} nodes, {} edges",
            path.display(),
            g.node_count(),
            g.edge_count()
        );
    }

    let executor = OperationExecutor::new(graph, registry)
        .with_viz_data(!no_viz)
        .with_echo(!no_echo);

    println!("graphwire Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Viz data: {}", !no_viz);
    println!("  Echo:     {}", !no_echo);
    println!();
    println!("Endpoints:");
    println!("  GET  /graph            - Export whole graph");
    println!("  GET  /graph/node/{{id}}  - Export single node");
    println!("  GET  /graph/edge/{{id}}  - Export single edge");
    println!("  POST /graph/update     - Ingest update stream");
    println!("  GET  /status           - Graph status");
    println!("  GET  /health           - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, executor).await
}

/// Ingest a stream file into the loader's graph, discarding the echo.
fn seed_graph(
    loader: &OperationExecutor,
    path: &Path,
    format: &str,
) -> Result<(), GraphWireError> {
    let canonical = validate_input_path(path)?;
    validate_file_size(&canonical, MAX_STREAM_FILE_SIZE)?;

    let file = std::fs::File::open(&canonical)?;
    let mut reader = BufReader::new(file);
    loader.update_graph(format, &mut reader, &mut std::io::sink())
}

// =============================================================================
// CONVERT COMMAND
// =============================================================================

/// Offline stream conversion: ingest the input file into a fresh graph,
/// then export it in the target format.
pub fn cmd_convert(
    input: &Path,
    from: &str,
    output: &Path,
    to: &str,
    viz: bool,
) -> Result<(), GraphWireError> {
    let output = validate_output_path(output)?;

    let executor = OperationExecutor::new(
        SharedGraph::new(),
        Arc::new(FormatRegistry::with_builtin_formats()),
    )
    .with_viz_data(viz)
    .with_echo(false);

    seed_graph(&executor, input, from)?;

    // Encode into memory first so a fault never leaves a partial file.
    let mut wire: Vec<u8> = Vec::new();
    {
        let mut encoder = executor.export_graph(to, &mut wire)?;
        // The snapshot leaves the stream open; a file export ends here.
        encoder.handle(&StreamEvent::StreamEnd)?;
    }
    std::fs::write(&output, &wire)?;

    let g = executor.graph().read();
    println!(
        "Converted {} ({}) -> {} ({}): {} nodes, {} edges",
        input.display(),
        from,
        output.display(),
        to,
        g.node_count(),
        g.edge_count()
    );

    Ok(())
}

// =============================================================================
// FORMATS COMMAND
// =============================================================================

/// List the registered wire formats.
pub fn cmd_formats() -> Result<(), GraphWireError> {
    let registry = FormatRegistry::with_builtin_formats();

    println!("Registered wire formats:");
    for key in registry.encoder_keys() {
        let decode = if registry.decoder(key).is_ok() {
            "encode+decode"
        } else {
            "encode only"
        };
        println!("  {:<8} {}", key, decode);
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
