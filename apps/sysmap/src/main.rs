//! # Sysmap - Information System Catalog Server
//!
//! The main binary for the Sysmap catalog.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for catalog operations
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │               apps/sysmap (THE BINARY)            │
//! │                                                   │
//! │   ┌─────────────┐          ┌─────────────┐        │
//! │   │   CLI       │          │   HTTP API  │        │
//! │   │  (clap)     │          │   (axum)    │        │
//! │   └──────┬──────┘          └──────┬──────┘        │
//! │          │                        │               │
//! │          └────────────┬───────────┘               │
//! │                       ▼                           │
//! │               ┌───────────────┐                   │
//! │               │  sysmap-core  │                   │
//! │               │ (THE CATALOG) │                   │
//! │               └───────────────┘                   │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! sysmap server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! sysmap status
//! sysmap list
//! sysmap search billing
//! ```

use clap::Parser;
use sysmap::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — SYSMAP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SYSMAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sysmap=info,tower_http=debug".into());

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

/// Print the Sysmap startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗██╗   ██╗███████╗███╗   ███╗ █████╗ ██████╗
  ██╔════╝╚██╗ ██╔╝██╔════╝████╗ ████║██╔══██╗██╔══██╗
  ███████╗ ╚████╔╝ ███████╗██╔████╔██║███████║██████╔╝
  ╚════██║  ╚██╔╝  ╚════██║██║╚██╔╝██║██╔══██║██╔═══╝
  ███████║   ██║   ███████║██║ ╚═╝ ██║██║  ██║██║
  ╚══════╝   ╚═╝   ╚══════╝╚═╝     ╚═╝╚═╝  ╚═╝╚═╝

  Information System Catalog v{}

  Systems • Dataflows • One Authoritative Edge Table
"#,
        env!("CARGO_PKG_VERSION")
    );
}
