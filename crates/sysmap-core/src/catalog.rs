//! # Catalog Module
//!
//! The use-case façade combining a storage backend with the domain
//! operations the boundary layer consumes.
//!
//! ## Storage Backends
//!
//! A `Catalog` owns one of two backends:
//! - `InMemory`: `MemoryCatalog` (fast, volatile)
//! - `Persistent`: `RedbCatalog` for disk-backed ACID storage
//!
//! The store handle is owned and explicitly injected — there is no
//! process-wide singleton. Each operation runs to completion against the
//! store; callers needing cross-call atomicity serialize access around
//! the `Catalog` value.

use crate::flows::FlowEngine;
use crate::query::{self, CatalogStatistics, SearchFilter};
use crate::storage::RedbCatalog;
use crate::store::{CatalogStore, MemoryCatalog};
use crate::types::{
    CatalogError, DataFlow, FlowDraft, FlowId, FlowPatch, InformationSystem, SystemDraft, SystemId,
};
use std::path::Path;

/// Storage backend for a Catalog.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryCatalog),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbCatalog),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryCatalog::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// RedbCatalog (database handle) cannot be safely cloned.

/// The catalog façade: one storage backend plus the use-case operations.
#[derive(Debug, Default)]
pub struct Catalog {
    backend: StorageBackend,
}

impl Catalog {
    /// Create a new empty catalog with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog over an existing in-memory store.
    #[must_use]
    pub fn with_memory(store: MemoryCatalog) -> Self {
        Self {
            backend: StorageBackend::InMemory(store),
        }
    }

    /// Create a catalog with persistent redb storage.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbCatalog::open(path)?),
        })
    }

    /// Create a catalog over an existing RedbCatalog.
    #[must_use]
    pub fn with_redb_catalog(store: RedbCatalog) -> Self {
        Self {
            backend: StorageBackend::Persistent(store),
        }
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    fn store(&self) -> &dyn CatalogStore {
        match &self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    fn store_mut(&mut self) -> &mut dyn CatalogStore {
        match &mut self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    // =========================================================================
    // SYSTEMS
    // =========================================================================

    /// Catalog a new system.
    ///
    /// Fails with `DuplicateCode` when the business code is already taken
    /// and with `InvalidArgument` on missing or oversized fields.
    pub fn create_system(
        &mut self,
        draft: SystemDraft,
    ) -> Result<InformationSystem, CatalogError> {
        draft.validate()?;

        if self.store().system_by_code(&draft.code)?.is_some() {
            return Err(CatalogError::DuplicateCode(draft.code));
        }

        self.store_mut().save_system(InformationSystem::create(draft))
    }

    /// Replace the draft-carried fields of an existing system.
    ///
    /// Identity, creation timestamp, version, and dependent-system
    /// references are preserved; `updated_at` advances. A changed code is
    /// re-checked for uniqueness against the other stored systems.
    pub fn update_system(
        &mut self,
        id: SystemId,
        draft: SystemDraft,
    ) -> Result<InformationSystem, CatalogError> {
        draft.validate()?;

        let Some(mut system) = self.store().system(id)? else {
            return Err(CatalogError::SystemNotFound(id));
        };

        if system.code != draft.code {
            if let Some(holder) = self.store().system_by_code(&draft.code)? {
                if holder.id != id {
                    return Err(CatalogError::DuplicateCode(draft.code));
                }
            }
        }

        system.name = draft.name;
        system.code = draft.code;
        system.description = draft.description;
        system.purpose = draft.purpose;
        system.status = draft.status;
        system.kind = draft.kind;
        system.owner = draft.owner;
        system.profile = draft.profile;
        system.business_functions = draft.business_functions;
        system.business_value = draft.business_value;
        system.cost_center = draft.cost_center;
        system.criticality_class = draft.criticality_class;
        system.parent_system = draft.parent_system;
        system.touch();

        self.store_mut().save_system(system)
    }

    /// Load a system by id, flow view populated.
    pub fn system(&self, id: SystemId) -> Result<Option<InformationSystem>, CatalogError> {
        self.store().system(id)
    }

    /// Load a system by business code.
    pub fn system_by_code(&self, code: &str) -> Result<Option<InformationSystem>, CatalogError> {
        self.store().system_by_code(code)
    }

    /// All systems, ordered by name.
    pub fn systems(&self) -> Result<Vec<InformationSystem>, CatalogError> {
        self.store().systems()
    }

    /// Delete a system and every flow that references it.
    ///
    /// Cascading keeps the edge table free of orphaned references after a
    /// node disappears. Returns whether the system existed.
    pub fn delete_system(&mut self, id: SystemId) -> Result<bool, CatalogError> {
        if !self.store().contains_system(id)? {
            return Ok(false);
        }

        let referencing = self.store().flows_for(id)?;
        for flow in referencing {
            self.store_mut().delete_flow(flow.id)?;
        }

        self.store_mut().delete_system(id)
    }

    /// Systems that list the given system among their dependents.
    pub fn dependents(&self, id: SystemId) -> Result<Vec<InformationSystem>, CatalogError> {
        self.store().dependents_of(id)
    }

    /// The parent of the given system, if any.
    pub fn parent(&self, id: SystemId) -> Result<Option<InformationSystem>, CatalogError> {
        self.store().parent_of(id)
    }

    /// Check whether a system exists.
    pub fn contains_system(&self, id: SystemId) -> Result<bool, CatalogError> {
        self.store().contains_system(id)
    }

    /// Total number of cataloged systems.
    pub fn system_count(&self) -> Result<usize, CatalogError> {
        self.store().system_count()
    }

    // =========================================================================
    // SEARCH & STATISTICS
    // =========================================================================

    /// Filtered search over the catalog (AND-combined filters plus
    /// case-insensitive substring query).
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(query::search(&self.store().systems()?, filter))
    }

    /// Statistics rollup over the whole catalog.
    pub fn statistics(&self) -> Result<CatalogStatistics, CatalogError> {
        let systems = self.store().systems()?;
        let total_flows = self.store().flow_count()?;
        Ok(query::statistics(&systems, total_flows))
    }

    // =========================================================================
    // DATAFLOWS
    // =========================================================================

    /// Create a dataflow between two existing systems.
    pub fn create_flow(&mut self, draft: FlowDraft) -> Result<DataFlow, CatalogError> {
        FlowEngine::create(self.store_mut(), draft)
    }

    /// Apply a partial update to a dataflow.
    pub fn update_flow(&mut self, id: FlowId, patch: FlowPatch) -> Result<DataFlow, CatalogError> {
        FlowEngine::update(self.store_mut(), id, patch)
    }

    /// Delete a dataflow. Returns whether a deletion occurred.
    pub fn delete_flow(&mut self, id: FlowId) -> Result<bool, CatalogError> {
        FlowEngine::delete(self.store_mut(), id)
    }

    /// Union of incoming and outgoing flows for a system.
    pub fn flows_for_system(&self, id: SystemId) -> Result<Vec<DataFlow>, CatalogError> {
        FlowEngine::flows_for_system(self.store(), id)
    }

    /// Every dataflow in the catalog, unique by id.
    pub fn flows(&self) -> Result<Vec<DataFlow>, CatalogError> {
        FlowEngine::all(self.store())
    }
}

// =============================================================================
// TESTS
// =============================================================================
