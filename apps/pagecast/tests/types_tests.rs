//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use pagecast::api::{
    AddComponentBody, HealthResponse, StatusResponse, UpdateComponentBody, status_for,
};
use pagecast_core::{
    ComponentNode, ErrorKind, ObserverEvent, OperationResult, PagecastError, ServiceStatus,
};
use serde_json::json;

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

// =============================================================================
// STATUS RESPONSE TESTS
// =============================================================================

#[test]
fn test_status_response_uses_camel_case() {
    let status = StatusResponse {
        success: true,
        data: ServiceStatus {
            connected_observers: 2,
            total_pages: 3,
            current_page_title: "Home".to_string(),
            available_operations: 7,
        },
    };

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["data"]["connectedObservers"], 2);
    assert_eq!(json["data"]["totalPages"], 3);
    assert_eq!(json["data"]["currentPageTitle"], "Home");
    assert!(json["data"]["availableOperations"].is_u64());
    assert_eq!(json["data"]["availableOperations"], 7);
}

// =============================================================================
// RESULT ENVELOPE TESTS
// =============================================================================

#[test]
fn test_success_envelope_omits_error() {
    let result = OperationResult::success("ok", json!({ "componentId": "a" })).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["componentId"], "a");
    assert!(json.get("error").is_none());
}

#[test]
fn test_failure_envelope_carries_reason() {
    let err = PagecastError::ComponentNotFound("ghost".to_string());
    let result = OperationResult::failure("Failed to update component", &err);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to update component");
    assert_eq!(json["error"], "Component not found: ghost");
    assert!(json.get("data").is_none());
}

// =============================================================================
// STATUS MAPPING TESTS
// =============================================================================

#[test]
fn test_error_kinds_map_to_http_status() {
    assert_eq!(status_for(ErrorKind::BadRequest), StatusCode::BAD_REQUEST);
    assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
    assert_eq!(status_for(ErrorKind::Refused), StatusCode::CONFLICT);
    assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        status_for(PagecastError::PageNotFound("p".into()).kind()),
        StatusCode::NOT_FOUND
    );
}

// =============================================================================
// REQUEST BODY TESTS
// =============================================================================

#[test]
fn test_add_component_body_accepts_both_spellings() {
    let short: AddComponentBody =
        serde_json::from_value(json!({ "type": "text", "props": { "content": "a" } })).unwrap();
    let long: AddComponentBody =
        serde_json::from_value(json!({ "kind": "text", "properties": { "content": "a" } }))
            .unwrap();

    assert_eq!(
        serde_json::to_value(&short).unwrap(),
        serde_json::to_value(&long).unwrap()
    );
}

#[test]
fn test_update_body_without_fields_is_empty_patch() {
    let body: UpdateComponentBody = serde_json::from_value(json!({})).unwrap();
    assert!(body.patch.is_empty());
}

// =============================================================================
// OBSERVER EVENT TESTS
// =============================================================================

#[test]
fn test_component_add_event_wire_shape() {
    let node: ComponentNode =
        serde_json::from_value(json!({ "id": "t", "type": "text", "props": { "content": "x" } }))
            .unwrap();
    let json = serde_json::to_value(ObserverEvent::ComponentAdd(node)).unwrap();

    assert_eq!(json["type"], "component_add");
    assert_eq!(json["payload"]["id"], "t");
    assert_eq!(json["payload"]["type"], "text");
    assert_eq!(json["payload"]["props"]["content"], "x");
    assert!(json["payload"].get("children").is_none());
    assert!(json["payload"].get("style").is_none());
}
