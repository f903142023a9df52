//! # API Endpoint Handlers
//!
//! HTTP handlers over the shared `MutationEngine`. Every failure is reported
//! with the `{ success: false, message, error }` envelope and a status code
//! derived from the error kind.

use super::{
    AppState,
    types::{AddComponentBody, HealthResponse, StatusResponse, ToolsResponse, UpdateComponentBody},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pagecast_core::{
    ErrorKind, OperationResult, PagecastError, RemoveComponentRequest, UpdateComponentRequest,
};
use serde_json::Value;

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// A failed request: what was attempted plus why it failed.
#[derive(Debug)]
pub struct ApiError {
    pub message: &'static str,
    pub error: PagecastError,
}

impl ApiError {
    fn new(message: &'static str, error: PagecastError) -> Self {
        Self { message, error }
    }
}

/// HTTP status for an error kind.
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Refused => StatusCode::CONFLICT,
        ErrorKind::TransportFault | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.error.kind());
        if status.is_server_error() {
            tracing::error!("{}: {}", self.message, self.error);
        } else {
            tracing::debug!("{}: {}", self.message, self.error);
        }
        (status, Json(OperationResult::failure(self.message, &self.error))).into_response()
    }
}

type ApiResult = Result<Json<OperationResult>, ApiError>;

/// Parse a JSON request body. An empty body reads as `null`.
fn json_body(body: &Bytes) -> Result<Value, PagecastError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| PagecastError::BadRequest(format!("request body is not valid JSON: {}", e)))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// OPERATION CATALOG
// =============================================================================

/// List every catalog operation with its input schema.
pub async fn tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    Json(ToolsResponse {
        success: true,
        data: engine.catalog(),
    })
}

/// Execute a catalog operation by name.
pub async fn execute_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult {
    const FAILED: &str = "Operation failed";

    let params = json_body(&body).map_err(|e| ApiError::new(FAILED, e))?;
    let mut engine = state.engine.write().await;
    engine
        .execute(&name, params)
        .map(Json)
        .map_err(|e| ApiError::new(FAILED, e))
}

// =============================================================================
// PAGES
// =============================================================================

/// The active page in a result envelope.
pub async fn current_page_handler(State(state): State<AppState>) -> ApiResult {
    let engine = state.engine.read().await;
    engine
        .get_current_page()
        .map(Json)
        .map_err(|e| ApiError::new("Failed to get current page", e))
}

/// The active page, bare, for viewers bootstrapping without a socket.
pub async fn default_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    Json(engine.store().active_page().clone())
}

/// Every stored page.
pub async fn list_pages_handler(State(state): State<AppState>) -> ApiResult {
    let engine = state.engine.read().await;
    engine
        .list_pages()
        .map(Json)
        .map_err(|e| ApiError::new("Failed to list pages", e))
}

/// Delete a page other than the default one.
pub async fn delete_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult {
    let mut engine = state.engine.write().await;
    engine
        .delete_page(&page_id)
        .map(Json)
        .map_err(|e| ApiError::new("Failed to delete page", e))
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Connected observers, page count and the active page title.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    Json(StatusResponse {
        success: true,
        data: engine.status(),
    })
}

// =============================================================================
// COMPONENT SHORTCUTS
// =============================================================================

/// Shortcut for `add_component`.
pub async fn add_component_handler(State(state): State<AppState>, body: Bytes) -> ApiResult {
    const FAILED: &str = "Failed to add component";

    let params = json_body(&body).map_err(|e| ApiError::new(FAILED, e))?;
    // Re-read through the loose body type so unknown keys are dropped.
    let body: AddComponentBody = serde_json::from_value(params)
        .map_err(|e| ApiError::new(FAILED, PagecastError::BadRequest(e.to_string())))?;
    let params = serde_json::to_value(body).map_err(|e| ApiError::new(FAILED, e.into()))?;

    let mut engine = state.engine.write().await;
    engine
        .execute("add_component", params)
        .map(Json)
        .map_err(|e| ApiError::new(FAILED, e))
}

/// Shortcut for `update_component`.
pub async fn update_component_handler(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
    body: Bytes,
) -> ApiResult {
    const FAILED: &str = "Failed to update component";

    let params = match json_body(&body).map_err(|e| ApiError::new(FAILED, e))? {
        Value::Null => UpdateComponentBody::default(),
        value => serde_json::from_value(value)
            .map_err(|e| ApiError::new(FAILED, PagecastError::BadRequest(e.to_string())))?,
    };

    let mut engine = state.engine.write().await;
    engine
        .update_component(UpdateComponentRequest {
            component_id,
            patch: params.patch,
        })
        .map(Json)
        .map_err(|e| ApiError::new(FAILED, e))
}

/// Shortcut for `remove_component`.
pub async fn remove_component_handler(
    State(state): State<AppState>,
    Path(component_id): Path<String>,
) -> ApiResult {
    let mut engine = state.engine.write().await;
    engine
        .remove_component(RemoveComponentRequest { component_id })
        .map(Json)
        .map_err(|e| ApiError::new("Failed to remove component", e))
}
