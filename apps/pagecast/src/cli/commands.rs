//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::ServerConfig;
use pagecast_core::{ComponentNode, MutationEngine, PagecastError, operations, seed_page};

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP/WebSocket server.
pub async fn cmd_server(config: ServerConfig) -> Result<(), PagecastError> {
    let engine = MutationEngine::new();

    println!("pagecast Live Component Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.host);
    println!("  Port:       {}", config.port);
    println!(
        "  Rate limit: {}",
        match config.rate_limit {
            0 => "disabled".to_string(),
            rps => format!("{} req/s", rps),
        }
    );
    println!("  Body limit: {} bytes", config.body_limit);
    println!();
    println!("Endpoints:");
    println!("  GET  /api/tools        - Operation catalog");
    println!("  POST /api/tools/{{name}} - Execute an operation");
    println!("  GET  /api/page/current - Active page");
    println!("  GET  /api/status       - Server status");
    println!("  GET  /ws               - Viewer WebSocket");
    println!("  GET  /health           - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config, engine).await
}

// =============================================================================
// OPERATIONS COMMAND
// =============================================================================

/// Print the operation catalog.
pub fn cmd_operations(json_mode: bool) -> Result<(), PagecastError> {
    let catalog = operations();

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("pagecast Operations");
    println!("===================");
    for spec in &catalog {
        println!();
        println!("{}", spec.name);
        println!("  {}", spec.description);
        if !spec.input_schema.required.is_empty() {
            println!("  required: {}", spec.input_schema.required.join(", "));
        }
    }

    Ok(())
}

// =============================================================================
// PAGE COMMAND
// =============================================================================

/// Print the default page viewers see on startup.
pub fn cmd_page(json_mode: bool) -> Result<(), PagecastError> {
    let page = seed_page();

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!("{} ({})", page.title, page.id);
    println!("{}", "=".repeat(page.title.len() + page.id.len() + 3));
    for line in outline(&page.components) {
        println!("{}", line);
    }
    println!();
    println!("{} components", page.node_count());

    Ok(())
}

/// One indented line per node, in pre-order.
pub fn outline(nodes: &[ComponentNode]) -> Vec<String> {
    fn walk(nodes: &[ComponentNode], depth: usize, out: &mut Vec<String>) {
        for node in nodes {
            out.push(format!("{}- {} [{}]", "  ".repeat(depth), node.id, node.kind));
            walk(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}
