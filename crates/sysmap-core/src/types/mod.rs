//! # Core Type Definitions
//!
//! This module contains the domain model for the Sysmap catalog:
//! - Identifiers (`SystemId`, `FlowId`)
//! - Enumerations (`SystemStatus`, `SystemKind`, `Criticality`)
//! - Value objects (`SystemOwner`, `TechnicalProfile`, `BusinessFunction`)
//! - Entities (`InformationSystem`, `DataFlow`) and their creation drafts
//! - Error types (`CatalogError`)
//!
//! ## Flow View Invariant
//!
//! An [`InformationSystem`] carries a transient `flows` field: the set of
//! dataflows where the system is source or target, unique by flow id. The
//! field is populated by the store when the system is loaded and is never
//! serialized — the flow table is the single source of truth for edges.

use crate::primitives::{DEFAULT_CRITICALITY_CLASS, DEFAULT_FREQUENCY, DEFAULT_VERSION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier for a cataloged information system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub Uuid);

impl SystemId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CatalogError::InvalidArgument(format!("malformed system id '{s}'")))
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a dataflow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowId(pub Uuid);

impl FlowId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CatalogError::InvalidArgument(format!("malformed dataflow id '{s}'")))
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Lifecycle status of an information system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    /// Under construction, not yet serving traffic.
    #[default]
    Development,
    /// Live and serving its business functions.
    Production,
    /// Scheduled for decommissioning.
    Deprecated,
}

impl SystemStatus {
    /// Canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Deprecated => "deprecated",
        }
    }

    /// Parse from the canonical label.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "deprecated" => Ok(Self::Deprecated),
            other => Err(CatalogError::InvalidArgument(format!(
                "unknown system status '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment classification of an information system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    /// Operated in-house.
    #[default]
    Internal,
    /// Operated by a third party.
    External,
    /// Consumed as a managed cloud service.
    Cloud,
}

impl SystemKind {
    /// Canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Cloud => "cloud",
        }
    }

    /// Parse from the canonical label.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s {
            "internal" => Ok(Self::Internal),
            "external" => Ok(Self::External),
            "cloud" => Ok(Self::Cloud),
            other => Err(CatalogError::InvalidArgument(format!(
                "unknown system kind '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for SystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criticality tier of a business function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    High,
    Medium,
    Low,
}

impl Criticality {
    /// Canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse from the canonical label.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(CatalogError::InvalidArgument(format!(
                "unknown criticality '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Ownership information for a system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemOwner {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Technical profile of a system: stack, languages, storage, deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalProfile {
    pub technology_stack: Vec<String>,
    pub programming_languages: Vec<String>,
    pub databases: Vec<String>,
    pub frameworks: Vec<String>,
    pub deployment_model: String,
    #[serde(default)]
    pub hosting_provider: Option<String>,
}

/// A named business capability supported by a system, tagged with a
/// criticality tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessFunction {
    pub name: String,
    pub description: String,
    pub criticality: Criticality,
    pub business_processes: Vec<String>,
}

// =============================================================================
// INFORMATION SYSTEM
// =============================================================================

/// A cataloged enterprise application: a node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationSystem {
    pub id: SystemId,
    pub name: String,
    /// Human-assigned business code, unique among stored systems.
    pub code: String,
    pub description: String,
    pub purpose: String,
    pub status: SystemStatus,
    pub kind: SystemKind,
    pub owner: SystemOwner,
    pub profile: TechnicalProfile,
    pub business_functions: Vec<BusinessFunction>,
    pub business_value: String,
    #[serde(default)]
    pub cost_center: Option<String>,
    pub version: String,
    /// Free-form tier label, distinct from the derived `is_critical` flag.
    pub criticality_class: String,
    #[serde(default)]
    pub parent_system: Option<SystemId>,
    #[serde(default)]
    pub dependent_systems: Vec<SystemId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Transient view: flows touching this system, unique by flow id.
    /// Populated by the store on load; never serialized.
    #[serde(skip)]
    pub flows: Vec<DataFlow>,
}

impl InformationSystem {
    /// Create a new system from a draft, stamping a fresh identifier and
    /// equal created/updated timestamps.
    #[must_use]
    pub fn create(draft: SystemDraft) -> Self {
        let now = Utc::now();
        Self {
            id: SystemId::generate(),
            name: draft.name,
            code: draft.code,
            description: draft.description,
            purpose: draft.purpose,
            status: draft.status,
            kind: draft.kind,
            owner: draft.owner,
            profile: draft.profile,
            business_functions: draft.business_functions,
            business_value: draft.business_value,
            cost_center: draft.cost_center,
            version: DEFAULT_VERSION.to_string(),
            criticality_class: draft.criticality_class,
            parent_system: draft.parent_system,
            dependent_systems: Vec::new(),
            created_at: now,
            updated_at: now,
            flows: Vec::new(),
        }
    }

    /// A system is critical iff at least one of its business functions
    /// has criticality `high`.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.business_functions
            .iter()
            .any(|f| f.criticality == Criticality::High)
    }

    /// Move the system to production.
    pub fn activate(&mut self) {
        if self.status != SystemStatus::Production {
            self.status = SystemStatus::Production;
            self.touch();
        }
    }

    /// Mark the system as deprecated.
    pub fn deprecate(&mut self) {
        if self.status != SystemStatus::Deprecated {
            self.status = SystemStatus::Deprecated;
            self.touch();
        }
    }

    /// Replace the version string.
    pub fn update_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
        self.touch();
    }

    /// Add a business function.
    pub fn add_business_function(&mut self, function: BusinessFunction) {
        self.business_functions.push(function);
        self.touch();
    }

    /// Remove a business function by name. Returns whether one was removed.
    pub fn remove_business_function(&mut self, name: &str) -> bool {
        let before = self.business_functions.len();
        self.business_functions.retain(|f| f.name != name);
        if self.business_functions.len() < before {
            self.touch();
            return true;
        }
        false
    }

    /// Register a dependent system reference (no-op if already present).
    pub fn add_dependent_system(&mut self, id: SystemId) {
        if !self.dependent_systems.contains(&id) {
            self.dependent_systems.push(id);
            self.touch();
        }
    }

    /// Remove a dependent system reference. Returns whether one was removed.
    pub fn remove_dependent_system(&mut self, id: SystemId) -> bool {
        let before = self.dependent_systems.len();
        self.dependent_systems.retain(|d| *d != id);
        if self.dependent_systems.len() < before {
            self.touch();
            return true;
        }
        false
    }

    /// Attach a flow to the transient view, keeping it unique by id.
    ///
    /// View maintenance only: does not advance `updated_at`.
    pub fn attach_flow(&mut self, flow: DataFlow) {
        if self.flows.iter().all(|f| f.id != flow.id) {
            self.flows.push(flow);
        }
    }

    /// Detach a flow from the transient view. Returns whether one was removed.
    pub fn detach_flow(&mut self, id: FlowId) -> bool {
        let before = self.flows.len();
        self.flows.retain(|f| f.id != id);
        self.flows.len() < before
    }

    /// Flows where this system is the target.
    pub fn incoming_flows(&self) -> impl Iterator<Item = &DataFlow> {
        self.flows.iter().filter(|f| f.target == self.id)
    }

    /// Flows where this system is the source.
    pub fn outgoing_flows(&self) -> impl Iterator<Item = &DataFlow> {
        self.flows.iter().filter(|f| f.source == self.id)
    }

    /// One-line summary of stack and languages.
    #[must_use]
    pub fn technology_summary(&self) -> String {
        format!(
            "{} | {}",
            self.profile.technology_stack.join(", "),
            self.profile.programming_languages.join(", ")
        )
    }

    /// Advance the updated-at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Creation input for an [`InformationSystem`].
///
/// Defaults follow the catalog conventions: status `development`, kind
/// `internal`, criticality class "Business operational".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDraft {
    pub name: String,
    pub code: String,
    pub description: String,
    pub purpose: String,
    pub owner: SystemOwner,
    pub profile: TechnicalProfile,
    pub business_functions: Vec<BusinessFunction>,
    pub business_value: String,
    #[serde(default)]
    pub status: SystemStatus,
    #[serde(default)]
    pub kind: SystemKind,
    #[serde(default = "default_criticality_class")]
    pub criticality_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_system: Option<SystemId>,
}

fn default_criticality_class() -> String {
    DEFAULT_CRITICALITY_CLASS.to_string()
}

impl SystemDraft {
    /// Validate required fields and input size limits.
    pub fn validate(&self) -> Result<(), CatalogError> {
        use crate::primitives::{MAX_LIST_ITEMS, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};

        if self.name.is_empty() {
            return Err(CatalogError::InvalidArgument("name must not be empty".into()));
        }
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(CatalogError::InvalidArgument(format!(
                "name length {} exceeds maximum {} bytes",
                self.name.len(),
                MAX_NAME_LENGTH
            )));
        }
        if self.code.is_empty() {
            return Err(CatalogError::InvalidArgument("code must not be empty".into()));
        }
        if self.code.len() > MAX_NAME_LENGTH {
            return Err(CatalogError::InvalidArgument(format!(
                "code length {} exceeds maximum {} bytes",
                self.code.len(),
                MAX_NAME_LENGTH
            )));
        }
        if self.description.len() > MAX_TEXT_LENGTH || self.purpose.len() > MAX_TEXT_LENGTH {
            return Err(CatalogError::InvalidArgument(format!(
                "text field exceeds maximum {MAX_TEXT_LENGTH} bytes"
            )));
        }
        if self.business_functions.len() > MAX_LIST_ITEMS
            || self.profile.technology_stack.len() > MAX_LIST_ITEMS
        {
            return Err(CatalogError::InvalidArgument(format!(
                "list field exceeds maximum {MAX_LIST_ITEMS} entries"
            )));
        }
        if self.owner.department.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "owner department must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// DATAFLOW
// =============================================================================

/// A directed edge describing data exchange between two systems.
///
/// A flow is reachable from both endpoints' views but stored exactly
/// once, keyed by its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFlow {
    pub id: FlowId,
    pub source: SystemId,
    pub target: SystemId,
    pub data_objects: Vec<String>,
    pub integration_technology: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DataFlow {
    /// Create a new flow from a draft, stamping a fresh identifier and
    /// equal created/updated timestamps.
    #[must_use]
    pub fn create(draft: FlowDraft) -> Self {
        let now = Utc::now();
        Self {
            id: FlowId::generate(),
            source: draft.source,
            target: draft.target,
            data_objects: draft.data_objects,
            integration_technology: draft.integration_technology,
            description: draft.description,
            frequency: draft.frequency,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the flow touches the given system as source or target.
    #[must_use]
    pub fn touches(&self, system: SystemId) -> bool {
        self.source == system || self.target == system
    }

    /// Replace the carried data objects.
    pub fn set_data_objects(&mut self, data_objects: Vec<String>) {
        self.data_objects = data_objects;
        self.touch();
    }

    /// Replace the integration technology label.
    pub fn set_integration_technology(&mut self, technology: impl Into<String>) {
        self.integration_technology = technology.into();
        self.touch();
    }

    /// Replace the free-text description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
        self.touch();
    }

    /// Replace the frequency label.
    pub fn set_frequency(&mut self, frequency: impl Into<String>) {
        self.frequency = frequency.into();
        self.touch();
    }

    /// Advance the updated-at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Creation input for a [`DataFlow`]. Frequency defaults to `real-time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDraft {
    pub source: SystemId,
    pub target: SystemId,
    pub data_objects: Vec<String>,
    pub integration_technology: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_frequency")]
    pub frequency: String,
}

fn default_frequency() -> String {
    DEFAULT_FREQUENCY.to_string()
}

impl FlowDraft {
    /// Validate required fields and input size limits.
    pub fn validate(&self) -> Result<(), CatalogError> {
        use crate::primitives::{MAX_LIST_ITEMS, MAX_NAME_LENGTH};

        if self.integration_technology.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "integration technology must not be empty".into(),
            ));
        }
        if self.integration_technology.len() > MAX_NAME_LENGTH {
            return Err(CatalogError::InvalidArgument(format!(
                "integration technology length {} exceeds maximum {} bytes",
                self.integration_technology.len(),
                MAX_NAME_LENGTH
            )));
        }
        if self.data_objects.len() > MAX_LIST_ITEMS {
            return Err(CatalogError::InvalidArgument(format!(
                "data objects exceed maximum {MAX_LIST_ITEMS} entries"
            )));
        }
        if self.frequency.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "frequency must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update for a [`DataFlow`]. Only supplied fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_objects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_technology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

impl FlowPatch {
    /// True when no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_objects.is_none()
            && self.integration_technology.is_none()
            && self.description.is_none()
            && self.frequency.is_none()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by catalog operations.
///
/// The boundary layer maps these onto HTTP status codes; the core never
/// panics and all failures are recoverable.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The referenced system does not exist.
    #[error("system not found: {0}")]
    SystemNotFound(SystemId),

    /// The referenced dataflow does not exist.
    #[error("dataflow not found: {0}")]
    FlowNotFound(FlowId),

    /// Another stored system already carries this business code.
    #[error("system code '{0}' already exists")]
    DuplicateCode(String),

    /// Malformed identifier or missing/oversized required field.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The storage layer failed.
    #[error("storage error: {0}")]
    Storage(String),
}

// =============================================================================
// TESTS
// =============================================================================
