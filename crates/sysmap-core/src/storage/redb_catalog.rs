//! # redb-backed Catalog Storage
//!
//! A disk-backed catalog store using the redb embedded database:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Records are serialized with postcard. System records go into the
//! `systems` table WITHOUT their flow views; the `dataflows` table is the
//! single source of truth for edges and each view is rebuilt at load time.

use crate::store::CatalogStore;
use crate::types::{CatalogError, DataFlow, FlowId, InformationSystem, SystemId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::collections::BTreeMap;
use std::path::Path;

/// Table for system records: system id (u128) -> postcard bytes
const SYSTEMS: TableDefinition<u128, &[u8]> = TableDefinition::new("systems");

/// Table for the code index: business code -> system id (u128)
const CODES: TableDefinition<&str, u128> = TableDefinition::new("system_codes");

/// Table for flow records: flow id (u128) -> postcard bytes
const FLOWS: TableDefinition<u128, &[u8]> = TableDefinition::new("dataflows");

fn storage_err(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::Storage(e.to_string())
}

fn decode_system(bytes: &[u8]) -> Result<InformationSystem, CatalogError> {
    postcard::from_bytes(bytes).map_err(storage_err)
}

fn decode_flow(bytes: &[u8]) -> Result<DataFlow, CatalogError> {
    postcard::from_bytes(bytes).map_err(storage_err)
}

/// A disk-backed catalog store using redb.
///
/// Maintains an in-memory code index for fast `system_by_code` lookups;
/// the index is rebuilt from the `system_codes` table at open time.
pub struct RedbCatalog {
    /// The redb database handle.
    db: Database,
    /// In-memory cache of code -> system id.
    code_cache: BTreeMap<String, SystemId>,
}

impl std::fmt::Debug for RedbCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbCatalog")
            .field("code_cache_size", &self.code_cache.len())
            .finish_non_exhaustive()
    }
}

impl RedbCatalog {
    /// Open or create a catalog database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(storage_err)?;
            let _ = write_txn.open_table(SYSTEMS).map_err(storage_err)?;
            let _ = write_txn.open_table(CODES).map_err(storage_err)?;
            let _ = write_txn.open_table(FLOWS).map_err(storage_err)?;
            write_txn.commit().map_err(storage_err)?;
        }

        // Load code cache
        let read_txn = db.begin_read().map_err(storage_err)?;
        let code_cache = {
            let table = read_txn.open_table(CODES).map_err(storage_err)?;
            let mut cache = BTreeMap::new();
            for entry in table.iter().map_err(storage_err)? {
                let (key, value) = entry.map_err(storage_err)?;
                cache.insert(
                    key.value().to_string(),
                    SystemId(uuid::Uuid::from_u128(value.value())),
                );
            }
            cache
        };

        Ok(Self { db, code_cache })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), CatalogError> {
        self.db.compact().map_err(storage_err)?;
        Ok(())
    }

    /// Rebuild the flow view of a loaded system from the flow table.
    fn hydrate(&self, mut system: InformationSystem) -> Result<InformationSystem, CatalogError> {
        system.flows = self.flows_touching(system.id)?;
        Ok(system)
    }

    /// All flows where the given system is source or target.
    fn flows_touching(&self, id: SystemId) -> Result<Vec<DataFlow>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(FLOWS).map_err(storage_err)?;

        let mut flows = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            let flow = decode_flow(value.value())?;
            if flow.touches(id) {
                flows.push(flow);
            }
        }
        Ok(flows)
    }
}

impl CatalogStore for RedbCatalog {
    fn save_system(
        &mut self,
        mut system: InformationSystem,
    ) -> Result<InformationSystem, CatalogError> {
        if let Some(&holder) = self.code_cache.get(&system.code) {
            if holder != system.id {
                return Err(CatalogError::DuplicateCode(system.code));
            }
        }

        // The view is derived; never stored
        system.flows = Vec::new();
        let bytes = postcard::to_allocvec(&system).map_err(storage_err)?;

        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let old_code = {
            let mut systems_table = write_txn.open_table(SYSTEMS).map_err(storage_err)?;
            let old_code = {
                let previous = systems_table
                    .insert(system.id.0.as_u128(), bytes.as_slice())
                    .map_err(storage_err)?;
                match previous {
                    Some(guard) => {
                        let stored = decode_system(guard.value())?;
                        (stored.code != system.code).then_some(stored.code)
                    }
                    None => None,
                }
            };

            let mut codes_table = write_txn.open_table(CODES).map_err(storage_err)?;
            if let Some(code) = &old_code {
                codes_table.remove(code.as_str()).map_err(storage_err)?;
            }
            codes_table
                .insert(system.code.as_str(), system.id.0.as_u128())
                .map_err(storage_err)?;
            old_code
        };
        write_txn.commit().map_err(storage_err)?;

        if let Some(code) = old_code {
            self.code_cache.remove(&code);
        }
        self.code_cache.insert(system.code.clone(), system.id);

        self.hydrate(system)
    }

    fn system(&self, id: SystemId) -> Result<Option<InformationSystem>, CatalogError> {
        let system = {
            let read_txn = self.db.begin_read().map_err(storage_err)?;
            let table = read_txn.open_table(SYSTEMS).map_err(storage_err)?;
            match table.get(id.0.as_u128()).map_err(storage_err)? {
                Some(guard) => Some(decode_system(guard.value())?),
                None => None,
            }
        };
        match system {
            Some(s) => Ok(Some(self.hydrate(s)?)),
            None => Ok(None),
        }
    }

    fn system_by_code(&self, code: &str) -> Result<Option<InformationSystem>, CatalogError> {
        match self.code_cache.get(code) {
            Some(&id) => self.system(id),
            None => Ok(None),
        }
    }

    fn systems(&self) -> Result<Vec<InformationSystem>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;

        // One pass over the flow table, shared by every hydration
        let all_flows = {
            let table = read_txn.open_table(FLOWS).map_err(storage_err)?;
            let mut flows = Vec::new();
            for entry in table.iter().map_err(storage_err)? {
                let (_, value) = entry.map_err(storage_err)?;
                flows.push(decode_flow(value.value())?);
            }
            flows
        };

        let table = read_txn.open_table(SYSTEMS).map_err(storage_err)?;
        let mut all = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            let mut system = decode_system(value.value())?;
            system.flows = all_flows
                .iter()
                .filter(|f| f.touches(system.id))
                .cloned()
                .collect();
            all.push(system);
        }

        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    fn delete_system(&mut self, id: SystemId) -> Result<bool, CatalogError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let removed_code = {
            let mut systems_table = write_txn.open_table(SYSTEMS).map_err(storage_err)?;
            let removed_code = {
                let removed = systems_table.remove(id.0.as_u128()).map_err(storage_err)?;
                match removed {
                    Some(guard) => Some(decode_system(guard.value())?.code),
                    None => None,
                }
            };

            if let Some(code) = &removed_code {
                let mut codes_table = write_txn.open_table(CODES).map_err(storage_err)?;
                codes_table.remove(code.as_str()).map_err(storage_err)?;
            }
            removed_code
        };
        write_txn.commit().map_err(storage_err)?;

        match removed_code {
            Some(code) => {
                self.code_cache.remove(&code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn contains_system(&self, id: SystemId) -> Result<bool, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(SYSTEMS).map_err(storage_err)?;
        Ok(table.get(id.0.as_u128()).map_err(storage_err)?.is_some())
    }

    fn system_count(&self) -> Result<usize, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(SYSTEMS).map_err(storage_err)?;
        Ok(table.len().map_err(storage_err)? as usize)
    }

    fn save_flow(&mut self, flow: DataFlow) -> Result<DataFlow, CatalogError> {
        let bytes = postcard::to_allocvec(&flow).map_err(storage_err)?;

        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(FLOWS).map_err(storage_err)?;
            table
                .insert(flow.id.0.as_u128(), bytes.as_slice())
                .map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;

        Ok(flow)
    }

    fn flow(&self, id: FlowId) -> Result<Option<DataFlow>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(FLOWS).map_err(storage_err)?;
        match table.get(id.0.as_u128()).map_err(storage_err)? {
            Some(guard) => Ok(Some(decode_flow(guard.value())?)),
            None => Ok(None),
        }
    }

    fn flows_for(&self, system: SystemId) -> Result<Vec<DataFlow>, CatalogError> {
        self.flows_touching(system)
    }

    fn flows(&self) -> Result<Vec<DataFlow>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(FLOWS).map_err(storage_err)?;

        let mut flows = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (_, value) = entry.map_err(storage_err)?;
            flows.push(decode_flow(value.value())?);
        }
        Ok(flows)
    }

    fn delete_flow(&mut self, id: FlowId) -> Result<bool, CatalogError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let removed = {
            let mut table = write_txn.open_table(FLOWS).map_err(storage_err)?;
            table.remove(id.0.as_u128()).map_err(storage_err)?.is_some()
        };
        write_txn.commit().map_err(storage_err)?;
        Ok(removed)
    }

    fn flow_count(&self) -> Result<usize, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(FLOWS).map_err(storage_err)?;
        Ok(table.len().map_err(storage_err)? as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FlowDraft, SystemDraft, SystemOwner, TechnicalProfile};
    use tempfile::TempDir;

    fn open_catalog(dir: &TempDir) -> RedbCatalog {
        RedbCatalog::open(dir.path().join("catalog.redb")).expect("open")
    }

    fn draft(name: &str, code: &str) -> SystemDraft {
        SystemDraft {
            name: name.to_string(),
            code: code.to_string(),
            description: "desc".to_string(),
            purpose: "purpose".to_string(),
            owner: SystemOwner {
                name: "Owner".to_string(),
                email: "owner@example.com".to_string(),
                department: "IT".to_string(),
                phone: Some("555-0100".to_string()),
            },
            profile: TechnicalProfile {
                technology_stack: vec!["Kafka".to_string()],
                programming_languages: vec!["Rust".to_string()],
                databases: vec![],
                frameworks: vec![],
                deployment_model: "cloud".to_string(),
                hosting_provider: Some("aws".to_string()),
            },
            business_functions: Vec::new(),
            business_value: "value".to_string(),
            status: Default::default(),
            kind: Default::default(),
            criticality_class: "Business operational".to_string(),
            cost_center: None,
            parent_system: None,
        }
    }

    fn flow_between(source: SystemId, target: SystemId) -> DataFlow {
        DataFlow::create(FlowDraft {
            source,
            target,
            data_objects: vec!["Invoice".to_string()],
            integration_technology: "REST".to_string(),
            description: Some("invoice feed".to_string()),
            frequency: "daily".to_string(),
        })
    }

    #[test]
    fn system_roundtrip_through_disk() {
        let dir = TempDir::new().expect("tempdir");
        let system = {
            let mut catalog = open_catalog(&dir);
            catalog
                .save_system(InformationSystem::create(draft("Billing", "BILL-01")))
                .expect("save")
        };

        // Reopen and verify the record and the code index survived
        let catalog = open_catalog(&dir);
        let loaded = catalog.system(system.id).expect("load").expect("present");
        assert_eq!(loaded.name, "Billing");
        assert_eq!(loaded.owner.phone.as_deref(), Some("555-0100"));
        assert_eq!(
            catalog.system_by_code("BILL-01").expect("lookup").map(|s| s.id),
            Some(system.id)
        );
    }

    #[test]
    fn duplicate_code_rejected_across_reopen() {
        let dir = TempDir::new().expect("tempdir");
        {
            let mut catalog = open_catalog(&dir);
            catalog
                .save_system(InformationSystem::create(draft("Billing", "BILL-01")))
                .expect("save");
        }

        let mut catalog = open_catalog(&dir);
        let clash = InformationSystem::create(draft("Other", "BILL-01"));
        assert!(matches!(
            catalog.save_system(clash),
            Err(CatalogError::DuplicateCode(_))
        ));
    }

    #[test]
    fn flow_view_rebuilt_from_flow_table() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = open_catalog(&dir);

        let a = catalog
            .save_system(InformationSystem::create(draft("A", "A-01")))
            .expect("save");
        let b = catalog
            .save_system(InformationSystem::create(draft("B", "B-01")))
            .expect("save");
        let flow = catalog.save_flow(flow_between(a.id, b.id)).expect("save");

        for id in [a.id, b.id] {
            let loaded = catalog.system(id).expect("load").expect("present");
            assert_eq!(loaded.flows.len(), 1);
            assert_eq!(loaded.flows[0].id, flow.id);
        }

        // Saving a hydrated system must not duplicate the flow row
        let loaded = catalog.system(a.id).expect("load").expect("present");
        catalog.save_system(loaded).expect("save");
        assert_eq!(catalog.flow_count().expect("count"), 1);
    }

    #[test]
    fn save_flow_upserts_by_id() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = open_catalog(&dir);

        let a = catalog
            .save_system(InformationSystem::create(draft("A", "A-01")))
            .expect("save");
        let b = catalog
            .save_system(InformationSystem::create(draft("B", "B-01")))
            .expect("save");

        let mut flow = catalog.save_flow(flow_between(a.id, b.id)).expect("save");
        flow.set_frequency("weekly");
        catalog.save_flow(flow.clone()).expect("save");

        assert_eq!(catalog.flow_count().expect("count"), 1);
        let stored = catalog.flow(flow.id).expect("load").expect("present");
        assert_eq!(stored.frequency, "weekly");
    }

    #[test]
    fn delete_system_cleans_code_index() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = open_catalog(&dir);

        let system = catalog
            .save_system(InformationSystem::create(draft("Billing", "BILL-01")))
            .expect("save");

        assert!(catalog.delete_system(system.id).expect("delete"));
        assert!(!catalog.delete_system(system.id).expect("delete"));
        assert!(catalog.system_by_code("BILL-01").expect("lookup").is_none());
        assert_eq!(catalog.system_count().expect("count"), 0);
    }

    #[test]
    fn code_change_persists_index_update() {
        let dir = TempDir::new().expect("tempdir");
        {
            let mut catalog = open_catalog(&dir);
            let mut system = catalog
                .save_system(InformationSystem::create(draft("Billing", "BILL-01")))
                .expect("save");
            system.code = "BILL-02".to_string();
            catalog.save_system(system).expect("save");
        }

        let catalog = open_catalog(&dir);
        assert!(catalog.system_by_code("BILL-01").expect("lookup").is_none());
        assert!(catalog.system_by_code("BILL-02").expect("lookup").is_some());
    }

    #[test]
    fn compact_preserves_contents() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = open_catalog(&dir);

        let a = catalog
            .save_system(InformationSystem::create(draft("A", "A-01")))
            .expect("save");
        catalog.save_flow(flow_between(a.id, a.id)).expect("save");

        catalog.compact().expect("compact");
        assert_eq!(catalog.system_count().expect("count"), 1);
        assert_eq!(catalog.flow_count().expect("count"), 1);
    }

    #[test]
    fn delete_flow_is_idempotent() {
        let dir = TempDir::new().expect("tempdir");
        let mut catalog = open_catalog(&dir);

        let a = catalog
            .save_system(InformationSystem::create(draft("A", "A-01")))
            .expect("save");
        let flow = catalog.save_flow(flow_between(a.id, a.id)).expect("save");

        assert!(catalog.delete_flow(flow.id).expect("delete"));
        assert!(!catalog.delete_flow(flow.id).expect("delete"));
        assert!(catalog.flows().expect("flows").is_empty());
    }
}
