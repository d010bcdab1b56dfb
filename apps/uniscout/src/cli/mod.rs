//! # Uniscout CLI Module
//!
//! This module implements the CLI interface for Uniscout.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show directory snapshot status
//! - `facets` - Show the facet catalogue
//! - `query` - Search, filter and paginate the directory

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uniscout_core::DirectoryError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Uniscout - University Directory Server
///
/// Search, filter, compare and paginate a university directory fetched
/// from an upstream REST API or a local JSON snapshot.
#[derive(Parser, Debug)]
#[command(name = "uniscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the upstream directory API base URL
    #[arg(short = 'u', long, global = true)]
    pub upstream: Option<String>,

    /// Read the snapshot from a local JSON file instead of the network
    #[arg(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show directory snapshot status
    Status,

    /// Show the facet catalogue for the snapshot
    Facets,

    /// Search, filter and paginate the directory
    Query {
        /// Free-text search over name, location and programs
        #[arg(short, long)]
        text: Option<String>,

        /// Exact location filter (case-insensitive)
        #[arg(short, long)]
        location: Option<String>,

        /// Program substring filter (case-insensitive)
        #[arg(short = 'P', long)]
        program: Option<String>,

        /// Tuition band: 0-2000, 2001-5000, 5001-10000 or 10001+
        #[arg(short = 'b', long)]
        tuition: Option<String>,

        /// Minimum rating, e.g. "3" or "3.5"
        #[arg(short, long)]
        rating: Option<String>,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page
        #[arg(long, default_value = "10")]
        page_size: usize,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), DirectoryError> {
    let config = load_config(&cli)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&config, host, port).await,
        Some(Commands::Status) => cmd_status(&config, cli.file.as_deref(), json_mode).await,
        Some(Commands::Facets) => cmd_facets(&config, cli.file.as_deref(), json_mode).await,
        Some(Commands::Query {
            text,
            location,
            program,
            tuition,
            rating,
            page,
            page_size,
        }) => {
            cmd_query(
                &config,
                cli.file.as_deref(),
                json_mode,
                QueryArgs {
                    text,
                    location,
                    program,
                    tuition,
                    rating,
                    page,
                    page_size,
                },
            )
            .await
        }
        None => {
            // No subcommand - show status by default
            cmd_status(&config, cli.file.as_deref(), json_mode).await
        }
    }
}
