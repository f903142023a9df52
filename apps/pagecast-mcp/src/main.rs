//! # pagecast MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to pagecast.
//!
//! Reads `PAGECAST_URL` for the server address (default: `http://localhost:8080`).
//!
//! Talks to agents via MCP over stdio and forwards every tool call to the
//! pagecast HTTP API, which pushes the result to connected viewers.

mod client;
mod server;

use client::PagecastClient;
use rmcp::{ServiceExt, transport::stdio};
use server::PagecastMcp;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout belongs to the MCP transport.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let url = std::env::var("PAGECAST_URL").unwrap_or_else(|_| "http://localhost:8080".into());

    tracing::info!("pagecast MCP server starting, target: {}", url);

    let mcp = PagecastMcp::new(PagecastClient::new(url));

    let service = mcp.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP serve error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
