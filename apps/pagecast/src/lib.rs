//! # pagecast
//!
//! Server-side pieces of pagecast: the HTTP operation API, the WebSocket
//! observer endpoint, configuration, and the CLI.

pub mod api;
pub mod cli;
pub mod config;

pub use config::ServerConfig;
