//! # graphwire CLI Module
//!
//! This module implements the CLI interface for graphwire.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server, optionally seeding the graph from a
//!   stream file
//! - `convert` - Offline conversion of a stream file between formats
//! - `formats` - List the registered wire formats

mod commands;

use clap::{Parser, Subcommand};
use graphwire_core::GraphWireError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// graphwire - Graph Streaming Server
///
/// Exposes a live, mutable graph over pluggable wire formats: snapshot the
/// whole graph, fetch a single node or edge, or stream mutations in.
#[derive(Parser, Debug)]
#[command(name = "graphwire")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Seed the graph from a stream file before serving
        #[arg(short, long)]
        load: Option<PathBuf>,

        /// Wire format of the seed file
        #[arg(long, default_value = "dgs")]
        load_format: String,

        /// Exclude visualization data from exported attributes
        #[arg(long)]
        no_viz: bool,

        /// Do not echo applied updates back to callers
        #[arg(long)]
        no_echo: bool,
    },

    /// Convert a stream file between wire formats
    Convert {
        /// Input stream file
        #[arg(short, long)]
        input: PathBuf,

        /// Wire format of the input file
        #[arg(long, default_value = "dgs")]
        from: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Wire format of the output file
        #[arg(long, default_value = "json")]
        to: String,

        /// Include visualization data in the converted output
        #[arg(long)]
        viz: bool,
    },

    /// List the registered wire formats
    Formats,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), GraphWireError> {
    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            load,
            load_format,
            no_viz,
            no_echo,
        }) => cmd_serve(&host, port, load.as_deref(), &load_format, no_viz, no_echo).await,
        Some(Commands::Convert {
            input,
            from,
            output,
            to,
            viz,
        }) => cmd_convert(&input, &from, &output, &to, viz),
        Some(Commands::Formats) | None => cmd_formats(),
    }
}
