//! # pagecast HTTP API Module
//!
//! HTTP operation API and WebSocket observer endpoint, built on axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/tools` - Operation catalog
//! - `POST /api/tools/{name}` - Execute a catalog operation
//! - `GET /api/page/current` - Active page in a result envelope
//! - `GET /api/page/default` - Active page, bare
//! - `GET /api/pages` - Every stored page
//! - `DELETE /api/pages/{id}` - Delete a page
//! - `GET /api/status` - Observer and page counts
//! - `POST /api/components` - Add a component
//! - `PUT /api/components/{id}` - Update a component
//! - `DELETE /api/components/{id}` - Remove a component
//! - `GET /ws` - WebSocket observer
//!
//! ## Security Configuration
//!
//! See `ServerConfig`: CORS origins, rate limit and body limit are all
//! configurable through `PAGECAST_*` environment variables.

mod handlers;
mod middleware;
mod types;
mod ws;

// Re-exports for integration tests (via `pagecast::api::*`)
pub use handlers::{ApiError, status_for};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    AddComponentBody, HealthResponse, StatusResponse, ToolsResponse, UpdateComponentBody,
};
pub use ws::ChannelObserver;

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use pagecast_core::{MutationEngine, PagecastError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the one engine every connection talks to.
#[derive(Clone)]
pub struct AppState {
    /// Mutations and observer registration take the write lock.
    pub engine: Arc<RwLock<MutationEngine>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State over `engine` with default configuration.
    #[must_use]
    pub fn new(engine: MutationEngine) -> Self {
        Self::with_config(engine, ServerConfig::default())
    }

    /// State over `engine` with explicit configuration.
    #[must_use]
    pub fn with_config(engine: MutationEngine, config: ServerConfig) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer from the configured origin setting.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (PAGECAST_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - if enabled
pub fn create_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let cors = build_cors_layer(config.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/tools", get(handlers::tools_handler))
        .route("/api/tools/{name}", post(handlers::execute_handler))
        .route("/api/page/current", get(handlers::current_page_handler))
        .route("/api/page/default", get(handlers::default_page_handler))
        .route("/api/pages", get(handlers::list_pages_handler))
        .route("/api/pages/{id}", delete(handlers::delete_page_handler))
        .route("/api/status", get(handlers::status_handler))
        .route("/api/components", post(handlers::add_component_handler))
        .route(
            "/api/components/{id}",
            put(handlers::update_component_handler)
                .delete(handlers::remove_component_handler),
        )
        .route("/ws", get(ws::ws_handler));

    match create_rate_limiter(config.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(config.body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl-C or SIGTERM.
pub async fn run_server(config: ServerConfig, engine: MutationEngine) -> Result<(), PagecastError> {
    let addr = config.bind_addr();
    let state = AppState::with_config(engine, config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PagecastError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("pagecast server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PagecastError::IoError(format!("Server error: {}", e)))?;

    tracing::info!("pagecast server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
