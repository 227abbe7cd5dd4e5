//! # Sysmap CLI Module
//!
//! This module implements the CLI interface for Sysmap.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show catalog status
//! - `list`   - List cataloged systems
//! - `show`   - Show one system by id or code
//! - `search` - Filtered search over the catalog
//! - `stats`  - Show the statistics rollup
//! - `init`   - Initialize a new database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sysmap_core::CatalogError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Sysmap - Information System Catalog
///
/// Catalogs enterprise systems and the dataflows between them. Every
/// dataflow is stored once and visible from both of its endpoints.
#[derive(Parser, Debug)]
#[command(name = "sysmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the catalog database
    #[arg(short = 'D', long, global = true, default_value = "sysmap.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

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
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show catalog status
    Status,

    /// List cataloged systems
    List,

    /// Show one system by id or business code
    Show {
        /// System id (UUID) or business code
        system: String,
    },

    /// Search the catalog
    Search {
        /// Case-insensitive substring match on name/description/code
        query: Option<String>,

        /// Filter by lifecycle status (development, production, deprecated)
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by owning department
        #[arg(short, long)]
        department: Option<String>,

        /// Filter by technology stack entry
        #[arg(short, long)]
        technology: Option<String>,
    },

    /// Show the statistics rollup
    Stats,

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), CatalogError> {
    let backend = cli.backend.as_str();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(&cli.database, backend, &host, port).await
        }
        Some(Commands::Status) => cmd_status(&cli.database, backend, json_mode),
        Some(Commands::List) => cmd_list(&cli.database, backend, json_mode),
        Some(Commands::Show { system }) => cmd_show(&cli.database, backend, json_mode, &system),
        Some(Commands::Search {
            query,
            status,
            department,
            technology,
        }) => cmd_search(
            &cli.database,
            backend,
            json_mode,
            query,
            status,
            department,
            technology,
        ),
        Some(Commands::Stats) => cmd_stats(&cli.database, backend, json_mode),
        Some(Commands::Init { force }) => cmd_init(&cli.database, backend, force),
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.database, backend, json_mode)
        }
    }
}
