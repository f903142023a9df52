//! # pagecast CLI Module
//!
//! This module implements the CLI interface for pagecast.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP/WebSocket server
//! - `operations` - List the operation catalog
//! - `page` - Show the seeded default page

mod commands;

use crate::config::ServerConfig;
use clap::{Parser, Subcommand};
use pagecast_core::PagecastError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// pagecast - live component tree server
///
/// Controllers change a tree of UI components over HTTP; every connected
/// viewer follows along over WebSocket.
#[derive(Parser, Debug)]
#[command(name = "pagecast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Start HTTP/WebSocket server
    Server {
        /// Host to bind to (overrides config and PAGECAST_HOST)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PAGECAST_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the operations controllers can call
    Operations,

    /// Show the page viewers see on startup
    Page,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), PagecastError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            let mut config = ServerConfig::load(cli.config.as_deref())?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cmd_server(config).await
        }
        Some(Commands::Operations) => cmd_operations(json_mode),
        Some(Commands::Page) => cmd_page(json_mode),
        None => {
            // No subcommand - serve with configured defaults
            let config = ServerConfig::load(cli.config.as_deref())?;
            cmd_server(config).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_overrides() {
        let cli = Cli::try_parse_from(["pagecast", "--quiet", "server", "-H", "0.0.0.0", "-p", "9001"])
            .expect("parse");
        assert!(cli.quiet);
        match cli.command {
            Some(Commands::Server { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9001));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pagecast", "operations", "--json-mode", "--config", "p.toml"])
            .expect("parse");
        assert!(cli.json_mode);
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Some(Commands::Operations)));
    }
}
