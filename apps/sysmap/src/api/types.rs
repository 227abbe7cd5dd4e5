//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Requests are explicit validated structs per operation — there are no
//! dict-shaped payloads. Optional enum fields carry documented serde
//! defaults: status `development`, system type `internal`, frequency
//! `real-time`, criticality class "Business operational".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysmap_core::{
    BusinessFunction, CatalogStatistics, Criticality, DataFlow, FlowDraft, FlowId, FlowPatch,
    InformationSystem, SearchFilter, SystemDraft, SystemId, SystemKind, SystemOwner, SystemStatus,
    TechnicalProfile,
    primitives::{DEFAULT_CRITICALITY_CLASS, DEFAULT_FREQUENCY},
};

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
// ERROR RESPONSE
// =============================================================================

/// Error payload: a message alongside the mapped HTTP status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =============================================================================
// SYSTEM REQUESTS
// =============================================================================

/// Create/replace payload for an information system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub purpose: String,
    pub owner: SystemOwner,
    pub technical_profile: TechnicalProfile,
    #[serde(default)]
    pub business_functions: Vec<BusinessFunction>,
    #[serde(default)]
    pub business_value: String,
    #[serde(default)]
    pub status: SystemStatus,
    #[serde(default)]
    pub system_type: SystemKind,
    #[serde(default = "default_criticality_class")]
    pub criticality_class: String,
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub parent_system: Option<SystemId>,
}

fn default_criticality_class() -> String {
    DEFAULT_CRITICALITY_CLASS.to_string()
}

impl SystemRequest {
    /// Convert into the core creation draft.
    pub fn into_draft(self) -> SystemDraft {
        SystemDraft {
            name: self.name,
            code: self.code,
            description: self.description,
            purpose: self.purpose,
            owner: self.owner,
            profile: self.technical_profile,
            business_functions: self.business_functions,
            business_value: self.business_value,
            status: self.status,
            kind: self.system_type,
            criticality_class: self.criticality_class,
            cost_center: self.cost_center,
            parent_system: self.parent_system,
        }
    }
}

/// Search payload. Filters AND-combine; `query` is a case-insensitive
/// substring match on name/description/code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub status: Option<SystemStatus>,
    #[serde(default)]
    pub system_type: Option<SystemKind>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub technology: Option<String>,
    #[serde(default)]
    pub criticality: Option<Criticality>,
}

impl SearchRequest {
    /// Convert into the core filter set.
    pub fn into_filter(self) -> SearchFilter {
        SearchFilter {
            query: self.query,
            status: self.status,
            kind: self.system_type,
            department: self.department,
            technology: self.technology,
            criticality: self.criticality,
        }
    }
}

// =============================================================================
// SYSTEM RESPONSES
// =============================================================================

/// Full system representation, including the derived criticality flag
/// and the flow view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemResponse {
    pub id: SystemId,
    pub name: String,
    pub code: String,
    pub description: String,
    pub purpose: String,
    pub status: SystemStatus,
    pub system_type: SystemKind,
    pub owner: SystemOwner,
    pub technical_profile: TechnicalProfile,
    pub business_functions: Vec<BusinessFunction>,
    pub business_value: String,
    pub cost_center: Option<String>,
    pub version: String,
    pub criticality_class: String,
    pub is_critical: bool,
    pub parent_system: Option<SystemId>,
    pub dependent_systems: Vec<SystemId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dataflows: Vec<FlowResponse>,
}

impl SystemResponse {
    /// Build the response from a loaded system.
    pub fn from_system(system: &InformationSystem) -> Self {
        Self {
            id: system.id,
            name: system.name.clone(),
            code: system.code.clone(),
            description: system.description.clone(),
            purpose: system.purpose.clone(),
            status: system.status,
            system_type: system.kind,
            owner: system.owner.clone(),
            technical_profile: system.profile.clone(),
            business_functions: system.business_functions.clone(),
            business_value: system.business_value.clone(),
            cost_center: system.cost_center.clone(),
            version: system.version.clone(),
            criticality_class: system.criticality_class.clone(),
            is_critical: system.is_critical(),
            parent_system: system.parent_system,
            dependent_systems: system.dependent_systems.clone(),
            created_at: system.created_at,
            updated_at: system.updated_at,
            dataflows: system.flows.iter().map(FlowResponse::from_flow).collect(),
        }
    }
}

/// List envelope for systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemListResponse {
    pub systems: Vec<SystemResponse>,
    pub total_count: usize,
}

impl SystemListResponse {
    pub fn from_systems(systems: &[InformationSystem]) -> Self {
        Self {
            systems: systems.iter().map(SystemResponse::from_system).collect(),
            total_count: systems.len(),
        }
    }
}

// =============================================================================
// DATAFLOW REQUESTS/RESPONSES
// =============================================================================

/// Create payload for a dataflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFlowRequest {
    pub source_system_id: SystemId,
    pub target_system_id: SystemId,
    #[serde(default)]
    pub data_objects: Vec<String>,
    pub integration_technology: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_frequency")]
    pub frequency: String,
}

fn default_frequency() -> String {
    DEFAULT_FREQUENCY.to_string()
}

impl CreateFlowRequest {
    /// Convert into the core creation draft.
    pub fn into_draft(self) -> FlowDraft {
        FlowDraft {
            source: self.source_system_id,
            target: self.target_system_id,
            data_objects: self.data_objects,
            integration_technology: self.integration_technology,
            description: self.description,
            frequency: self.frequency,
        }
    }
}

/// Partial update payload for a dataflow: only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFlowRequest {
    #[serde(default)]
    pub data_objects: Option<Vec<String>>,
    #[serde(default)]
    pub integration_technology: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
}

impl UpdateFlowRequest {
    /// Convert into the core patch.
    pub fn into_patch(self) -> FlowPatch {
        FlowPatch {
            data_objects: self.data_objects,
            integration_technology: self.integration_technology,
            description: self.description,
            frequency: self.frequency,
        }
    }
}

/// Dataflow representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowResponse {
    pub id: FlowId,
    pub source_system_id: SystemId,
    pub target_system_id: SystemId,
    pub data_objects: Vec<String>,
    pub integration_technology: String,
    pub description: Option<String>,
    pub frequency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FlowResponse {
    /// Build the response from a loaded flow.
    pub fn from_flow(flow: &DataFlow) -> Self {
        Self {
            id: flow.id,
            source_system_id: flow.source,
            target_system_id: flow.target,
            data_objects: flow.data_objects.clone(),
            integration_technology: flow.integration_technology.clone(),
            description: flow.description.clone(),
            frequency: flow.frequency.clone(),
            created_at: flow.created_at,
            updated_at: flow.updated_at,
        }
    }
}

/// List envelope for dataflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowListResponse {
    pub dataflows: Vec<FlowResponse>,
    pub total_count: usize,
}

impl FlowListResponse {
    pub fn from_flows(flows: &[DataFlow]) -> Self {
        Self {
            dataflows: flows.iter().map(FlowResponse::from_flow).collect(),
            total_count: flows.len(),
        }
    }
}

/// Deletion outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

// =============================================================================
// STATISTICS RESPONSE
// =============================================================================

/// Statistics rollup, re-exported from the core verbatim: the core type
/// already serializes deterministically (BTreeMap ordering).
pub type StatisticsResponse = CatalogStatistics;
