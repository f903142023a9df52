//! # API Request/Response Types
//!
//! JSON structures for the HTTP API that are not engine envelopes.

use pagecast_core::{NodePatch, OperationSpec, Properties, ServiceStatus, Style};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// READ ENVELOPES
// =============================================================================

/// `GET /api/tools` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub success: bool,
    pub data: Vec<OperationSpec>,
}

/// `GET /api/status` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub data: ServiceStatus,
}

// =============================================================================
// SHORTCUT REQUESTS
// =============================================================================

/// `POST /api/components` body.
///
/// Kept loose so that a missing `type` or `props` is reported by the engine
/// as a bad request with the usual failure envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddComponentBody {
    #[serde(rename = "type", alias = "kind", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(rename = "props", alias = "properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// `PUT /api/components/{id}` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateComponentBody {
    #[serde(flatten)]
    pub patch: NodePatch,
}
