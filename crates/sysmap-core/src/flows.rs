//! # Flow Engine
//!
//! Consolidates dataflow mutation and retrieval for the Sysmap catalog.
//!
//! A dataflow is reachable from two independent paths — the source
//! system's view and the target system's view — but it is persisted
//! exactly once, keyed by its own id. The operations here go through the
//! flow table directly; endpoint views are derived on load, so a single
//! `save_flow` keeps both endpoints' visible state correct and no
//! after-the-fact de-duplication is ever required.

use crate::store::CatalogStore;
use crate::types::{CatalogError, DataFlow, FlowDraft, FlowId, FlowPatch, SystemId};

/// Stateless engine for dataflow operations over a catalog store.
pub struct FlowEngine;

impl FlowEngine {
    /// Create a new dataflow between two existing systems.
    ///
    /// Fails with `SystemNotFound` if either endpoint is absent, without
    /// persisting anything. The edge is written once; both endpoints see
    /// it on their next load.
    pub fn create(
        store: &mut dyn CatalogStore,
        draft: FlowDraft,
    ) -> Result<DataFlow, CatalogError> {
        draft.validate()?;

        if !store.contains_system(draft.source)? {
            return Err(CatalogError::SystemNotFound(draft.source));
        }
        if !store.contains_system(draft.target)? {
            return Err(CatalogError::SystemNotFound(draft.target));
        }

        store.save_flow(DataFlow::create(draft))
    }

    /// Apply a partial update to a dataflow.
    ///
    /// Only supplied fields change; each applied field advances
    /// `updated_at`. An empty patch is a no-op that returns the stored
    /// flow unchanged. One save suffices: the flow row is the single
    /// source of truth for both endpoints.
    pub fn update(
        store: &mut dyn CatalogStore,
        id: FlowId,
        patch: FlowPatch,
    ) -> Result<DataFlow, CatalogError> {
        let Some(mut flow) = store.flow(id)? else {
            return Err(CatalogError::FlowNotFound(id));
        };

        if patch.is_empty() {
            return Ok(flow);
        }

        if let Some(data_objects) = patch.data_objects {
            flow.set_data_objects(data_objects);
        }
        if let Some(technology) = patch.integration_technology {
            if technology.is_empty() {
                return Err(CatalogError::InvalidArgument(
                    "integration technology must not be empty".into(),
                ));
            }
            flow.set_integration_technology(technology);
        }
        if let Some(description) = patch.description {
            flow.set_description(description);
        }
        if let Some(frequency) = patch.frequency {
            if frequency.is_empty() {
                return Err(CatalogError::InvalidArgument(
                    "frequency must not be empty".into(),
                ));
            }
            flow.set_frequency(frequency);
        }

        store.save_flow(flow)
    }

    /// Delete a dataflow. Returns whether a deletion occurred.
    ///
    /// Idempotent: deleting an unknown id is a no-op, not an error.
    pub fn delete(store: &mut dyn CatalogStore, id: FlowId) -> Result<bool, CatalogError> {
        store.delete_flow(id)
    }

    /// Union of incoming and outgoing flows for a system, loaded directly
    /// from the flow table.
    ///
    /// Never computed by merging a cached view with a separate query —
    /// that path duplicates self-referential or bidirectionally-cached
    /// edges.
    pub fn flows_for_system(
        store: &dyn CatalogStore,
        system: SystemId,
    ) -> Result<Vec<DataFlow>, CatalogError> {
        if !store.contains_system(system)? {
            return Err(CatalogError::SystemNotFound(system));
        }
        store.flows_for(system)
    }

    /// Every dataflow in the catalog, unique by id.
    pub fn all(store: &dyn CatalogStore) -> Result<Vec<DataFlow>, CatalogError> {
        store.flows()
    }
}

// =============================================================================
// TESTS
// =============================================================================
