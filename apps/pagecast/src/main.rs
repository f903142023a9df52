//! # pagecast - Live Component Server
//!
//! The main binary for pagecast.
//!
//! This application provides:
//! - HTTP operation API (axum-based)
//! - WebSocket endpoint for viewers
//! - CLI interface
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  apps/pagecast (THE SERVER)                  │
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐   │
//! │  │   CLI       │    │  HTTP API   │    │  WebSocket /ws  │   │
//! │  │  (clap)     │    │   (axum)    │    │   (observers)   │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬────────┘   │
//! │         │                  │                    │            │
//! │         └──────────────────┼────────────────────┘            │
//! │                            ▼                                 │
//! │                   ┌─────────────────┐                        │
//! │                   │  pagecast-core  │                        │
//! │                   │  (THE ENGINE)   │                        │
//! │                   └─────────────────┘                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! pagecast server --host 0.0.0.0 --port 8080
//!
//! # Inspect
//! pagecast operations --json-mode
//! pagecast page
//! ```

use clap::Parser;
use pagecast::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // PAGECAST_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PAGECAST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pagecast=info,pagecast_core=info,tower_http=debug".into());

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

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the pagecast startup banner.
fn print_banner() {
    println!(
        r#"
   ___  ___ ____ ____ ____ ____ ____ ___
  / _ \/ _ `/ _ `/ -_) __/ _ `(_-</ __/
 / .__/\_,_/\_, /\__/\__/\_,_/___/\__/
/_/        /___/

  Live Component Server v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
