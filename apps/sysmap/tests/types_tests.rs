//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use sysmap::api::{
    CreateFlowRequest, ErrorResponse, HealthResponse, SearchRequest, SystemRequest,
    UpdateFlowRequest,
};
use sysmap_core::{SystemKind, SystemStatus};

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
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.4.0".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.4.0\""));
}

// =============================================================================
// SYSTEM REQUEST TESTS
// =============================================================================

fn minimal_system_json() -> String {
    r#"{
        "name": "Billing",
        "code": "BILL-01",
        "owner": {
            "name": "Dana Reyes",
            "email": "dana.reyes@example.com",
            "department": "Finance"
        },
        "technical_profile": {
            "technology_stack": ["PostgreSQL"],
            "programming_languages": ["Rust"],
            "databases": ["PostgreSQL"],
            "frameworks": [],
            "deployment_model": "on-premise"
        }
    }"#
    .to_string()
}

#[test]
fn test_system_request_defaults() {
    let request: SystemRequest = serde_json::from_str(&minimal_system_json()).unwrap();

    assert_eq!(request.status, SystemStatus::Development);
    assert_eq!(request.system_type, SystemKind::Internal);
    assert_eq!(request.criticality_class, "Business operational");
    assert!(request.business_functions.is_empty());
    assert!(request.cost_center.is_none());
    assert!(request.parent_system.is_none());
}

#[test]
fn test_system_request_explicit_enums() {
    let json = minimal_system_json().replace(
        "\"code\": \"BILL-01\",",
        "\"code\": \"BILL-01\", \"status\": \"production\", \"system_type\": \"cloud\",",
    );
    let request: SystemRequest = serde_json::from_str(&json).unwrap();

    assert_eq!(request.status, SystemStatus::Production);
    assert_eq!(request.system_type, SystemKind::Cloud);
}

#[test]
fn test_system_request_rejects_unknown_status() {
    let json = minimal_system_json().replace(
        "\"code\": \"BILL-01\",",
        "\"code\": \"BILL-01\", \"status\": \"active\",",
    );
    assert!(serde_json::from_str::<SystemRequest>(&json).is_err());
}

#[test]
fn test_system_request_into_draft_maps_fields() {
    let request: SystemRequest = serde_json::from_str(&minimal_system_json()).unwrap();
    let draft = request.into_draft();

    assert_eq!(draft.name, "Billing");
    assert_eq!(draft.code, "BILL-01");
    assert_eq!(draft.kind, SystemKind::Internal);
    assert_eq!(draft.owner.department, "Finance");
    assert_eq!(draft.profile.deployment_model, "on-premise");
}

// =============================================================================
// FLOW REQUEST TESTS
// =============================================================================

#[test]
fn test_create_flow_request_default_frequency() {
    let json = r#"{
        "source_system_id": "c2d9a3f4-52f5-4f3c-9c8b-2b6f2a9a1e11",
        "target_system_id": "a1b2c3d4-e5f6-4a3b-8c9d-0e1f2a3b4c5d",
        "data_objects": ["Invoice"],
        "integration_technology": "REST"
    }"#;
    let request: CreateFlowRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.frequency, "real-time");
    assert!(request.description.is_none());

    let draft = request.into_draft();
    assert_eq!(draft.integration_technology, "REST");
    assert_eq!(draft.frequency, "real-time");
}

#[test]
fn test_update_flow_request_partial() {
    let request: UpdateFlowRequest =
        serde_json::from_str(r#"{ "frequency": "weekly" }"#).unwrap();

    assert_eq!(request.frequency.as_deref(), Some("weekly"));
    assert!(request.data_objects.is_none());

    let patch = request.into_patch();
    assert!(!patch.is_empty());
    assert_eq!(patch.frequency.as_deref(), Some("weekly"));
}

#[test]
fn test_update_flow_request_empty_patch() {
    let request: UpdateFlowRequest = serde_json::from_str("{}").unwrap();
    assert!(request.into_patch().is_empty());
}

// =============================================================================
// SEARCH REQUEST TESTS
// =============================================================================

#[test]
fn test_search_request_all_fields_optional() {
    let request: SearchRequest = serde_json::from_str("{}").unwrap();
    let filter = request.into_filter();

    assert!(filter.query.is_none());
    assert!(filter.status.is_none());
    assert!(filter.kind.is_none());
}

#[test]
fn test_search_request_maps_system_type_to_kind() {
    let request: SearchRequest =
        serde_json::from_str(r#"{ "system_type": "cloud", "query": "crm" }"#).unwrap();
    let filter = request.into_filter();

    assert_eq!(filter.kind, Some(SystemKind::Cloud));
    assert_eq!(filter.query.as_deref(), Some("crm"));
}

// =============================================================================
// ERROR RESPONSE TESTS
// =============================================================================

#[test]
fn test_error_response_serialization() {
    let error = ErrorResponse::new("system not found");
    let json = serde_json::to_string(&error).unwrap();
    assert_eq!(json, r#"{"error":"system not found"}"#);
}
