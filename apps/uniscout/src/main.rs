//! # Uniscout - University Directory Server
//!
//! The main binary for the Uniscout directory engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for directory operations
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                    apps/uniscout (THE BINARY)                  │
//! │                                                                │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────────────┐  │
//! │  │   CLI    │   │ HTTP API │   │  Upstream / Leads /      │  │
//! │  │  (clap)  │   │  (axum)  │   │  Notifications (reqwest) │  │
//! │  └─────┬────┘   └─────┬────┘   └────────────┬─────────────┘  │
//! │        │              │                     │                 │
//! │        └──────────────┼─────────────────────┘                 │
//! │                       ▼                                       │
//! │               ┌───────────────┐                               │
//! │               │ uniscout-core │                               │
//! │               │  (THE LOGIC)  │                               │
//! │               └───────────────┘                               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! uniscout server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! uniscout status
//! uniscout query -t "engineering" -l "Boston" --page 2
//! uniscout facets --json-mode
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uniscout::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — UNISCOUT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("UNISCOUT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "uniscout=info,tower_http=debug".into());

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

/// Print the Uniscout startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗   ██╗███╗   ██╗██╗███████╗ ██████╗ ██████╗ ██╗   ██╗████████╗
  ██║   ██║████╗  ██║██║██╔════╝██╔════╝██╔═══██╗██║   ██║╚══██╔══╝
  ██║   ██║██╔██╗ ██║██║███████╗██║     ██║   ██║██║   ██║   ██║
  ██║   ██║██║╚██╗██║██║╚════██║██║     ██║   ██║██║   ██║   ██║
  ╚██████╔╝██║ ╚████║██║███████║╚██████╗╚██████╔╝╚██████╔╝   ██║
   ╚═════╝ ╚═╝  ╚═══╝╚═╝╚══════╝ ╚═════╝ ╚═════╝  ╚═════╝    ╚═╝

  University Directory Server v{}

  Search • Filter • Compare
"#,
        env!("CARGO_PKG_VERSION")
    );
}
