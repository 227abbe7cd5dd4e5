//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Error mapping at the boundary:
//! - `SystemNotFound` / `FlowNotFound` -> 404
//! - `InvalidArgument` (malformed id, missing field) -> 400
//! - `DuplicateCode` -> 409
//! - `Storage` -> 500

use super::{
    AppState,
    types::{
        CreateFlowRequest, DeleteResponse, ErrorResponse, FlowListResponse, FlowResponse,
        HealthResponse, SearchRequest, SystemListResponse, SystemRequest, SystemResponse,
        UpdateFlowRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sysmap_core::{CatalogError, FlowId, SystemId};

/// Map a catalog error to its HTTP status and payload.
fn error_response(err: &CatalogError) -> Response {
    let status = match err {
        CatalogError::SystemNotFound(_) | CatalogError::FlowNotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        CatalogError::DuplicateCode(_) => StatusCode::CONFLICT,
        CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(err.to_string()))).into_response()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// SYSTEM HANDLERS
// =============================================================================

/// List all systems, ordered by name.
pub async fn list_systems_handler(State(state): State<AppState>) -> Response {
    let catalog = state.catalog.read().await;
    match catalog.systems() {
        Ok(systems) => {
            (StatusCode::OK, Json(SystemListResponse::from_systems(&systems))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Catalog a new system.
pub async fn create_system_handler(
    State(state): State<AppState>,
    Json(request): Json<SystemRequest>,
) -> Response {
    let mut catalog = state.catalog.write().await;
    match catalog.create_system(request.into_draft()) {
        Ok(system) => {
            tracing::info!(code = %system.code, "system created");
            (StatusCode::CREATED, Json(SystemResponse::from_system(&system))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Load a single system by id.
pub async fn get_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match SystemId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let catalog = state.catalog.read().await;
    match catalog.system(id) {
        Ok(Some(system)) => {
            (StatusCode::OK, Json(SystemResponse::from_system(&system))).into_response()
        }
        Ok(None) => error_response(&CatalogError::SystemNotFound(id)),
        Err(e) => error_response(&e),
    }
}

/// Replace the editable fields of a system.
pub async fn update_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SystemRequest>,
) -> Response {
    let id = match SystemId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let mut catalog = state.catalog.write().await;
    match catalog.update_system(id, request.into_draft()) {
        Ok(system) => {
            (StatusCode::OK, Json(SystemResponse::from_system(&system))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Delete a system and its referencing flows.
pub async fn delete_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match SystemId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let mut catalog = state.catalog.write().await;
    match catalog.delete_system(id) {
        Ok(true) => (StatusCode::OK, Json(DeleteResponse { deleted: true })).into_response(),
        Ok(false) => error_response(&CatalogError::SystemNotFound(id)),
        Err(e) => error_response(&e),
    }
}

/// Union of incoming and outgoing flows for a system.
pub async fn system_flows_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match SystemId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let catalog = state.catalog.read().await;
    match catalog.flows_for_system(id) {
        Ok(flows) => {
            (StatusCode::OK, Json(FlowListResponse::from_flows(&flows))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Systems that list the given system among their dependents.
pub async fn system_dependents_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match SystemId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let catalog = state.catalog.read().await;
    match catalog.dependents(id) {
        Ok(systems) => {
            (StatusCode::OK, Json(SystemListResponse::from_systems(&systems))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// The parent of the given system.
pub async fn system_parent_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match SystemId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let catalog = state.catalog.read().await;
    match catalog.parent(id) {
        Ok(Some(parent)) => {
            (StatusCode::OK, Json(SystemResponse::from_system(&parent))).into_response()
        }
        Ok(None) => error_response(&CatalogError::SystemNotFound(id)),
        Err(e) => error_response(&e),
    }
}

/// Filtered search over the catalog.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    let catalog = state.catalog.read().await;
    match catalog.search(&request.into_filter()) {
        Ok(systems) => {
            (StatusCode::OK, Json(SystemListResponse::from_systems(&systems))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

// =============================================================================
// STATISTICS HANDLER
// =============================================================================

/// Statistics rollup over the whole catalog.
pub async fn statistics_handler(State(state): State<AppState>) -> Response {
    let catalog = state.catalog.read().await;
    match catalog.statistics() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(&e),
    }
}

// =============================================================================
// DATAFLOW HANDLERS
// =============================================================================

/// Every dataflow, unique by id.
pub async fn list_flows_handler(State(state): State<AppState>) -> Response {
    let catalog = state.catalog.read().await;
    match catalog.flows() {
        Ok(flows) => {
            (StatusCode::OK, Json(FlowListResponse::from_flows(&flows))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Create a dataflow between two existing systems.
pub async fn create_flow_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateFlowRequest>,
) -> Response {
    let mut catalog = state.catalog.write().await;
    match catalog.create_flow(request.into_draft()) {
        Ok(flow) => {
            tracing::info!(source = %flow.source, target = %flow.target, "dataflow created");
            (StatusCode::CREATED, Json(FlowResponse::from_flow(&flow))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Apply a partial update to a dataflow.
pub async fn update_flow_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateFlowRequest>,
) -> Response {
    let id = match FlowId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let mut catalog = state.catalog.write().await;
    match catalog.update_flow(id, request.into_patch()) {
        Ok(flow) => (StatusCode::OK, Json(FlowResponse::from_flow(&flow))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Delete a dataflow. Unknown ids map to 404.
pub async fn delete_flow_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match FlowId::parse(&id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let mut catalog = state.catalog.write().await;
    match catalog.delete_flow(id) {
        Ok(true) => (StatusCode::OK, Json(DeleteResponse { deleted: true })).into_response(),
        Ok(false) => error_response(&CatalogError::FlowNotFound(id)),
        Err(e) => error_response(&e),
    }
}
