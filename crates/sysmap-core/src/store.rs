//! # Catalog Store
//!
//! The store abstraction for the Sysmap catalog.
//!
//! This module defines the `CatalogStore` trait and the in-memory
//! implementation. All data structures use `BTreeMap` for deterministic
//! ordering.
//!
//! ## Edge Ownership
//!
//! The flow table owns every dataflow, keyed by flow id. A system record
//! never carries its flow view into storage; the view is recomputed each
//! time the system is loaded. This eliminates edge duplication at the
//! source instead of de-duplicating after the fact.

use crate::types::{
    CatalogError, Criticality, DataFlow, FlowId, InformationSystem, SystemId, SystemKind,
    SystemStatus,
};
use std::collections::BTreeMap;

// =============================================================================
// CATALOGSTORE TRAIT
// =============================================================================

/// Durable CRUD for systems and dataflows, with secondary lookups.
///
/// All fallible operations return `Result<T, CatalogError>` to support
/// both in-memory and persistent backends uniformly.
///
/// Filtered variants are default methods — predicates over [`Self::systems`] —
/// so a backend only overrides them when it has a cheaper index.
pub trait CatalogStore {
    /// Insert or update a system, keyed by its id.
    ///
    /// The transient flow view is never written; the returned system
    /// carries a freshly recomputed view. Fails with `DuplicateCode` if
    /// another stored system already holds the code.
    fn save_system(
        &mut self,
        system: InformationSystem,
    ) -> Result<InformationSystem, CatalogError>;

    /// Load a system by id, with its flow view populated from the flow table.
    fn system(&self, id: SystemId) -> Result<Option<InformationSystem>, CatalogError>;

    /// Load a system by its unique business code.
    fn system_by_code(&self, code: &str) -> Result<Option<InformationSystem>, CatalogError>;

    /// All systems, ordered by name.
    fn systems(&self) -> Result<Vec<InformationSystem>, CatalogError>;

    /// Delete a system row. Returns whether a deletion occurred.
    ///
    /// Flows referencing the system are NOT touched here; cascade policy
    /// lives in the use-case layer.
    fn delete_system(&mut self, id: SystemId) -> Result<bool, CatalogError>;

    /// Check whether a system exists.
    fn contains_system(&self, id: SystemId) -> Result<bool, CatalogError>;

    /// Total number of stored systems.
    fn system_count(&self) -> Result<usize, CatalogError>;

    /// Insert or update a single flow, keyed by flow id.
    ///
    /// Idempotent by identifier: saving the same flow twice leaves one row.
    fn save_flow(&mut self, flow: DataFlow) -> Result<DataFlow, CatalogError>;

    /// Load a flow by id.
    fn flow(&self, id: FlowId) -> Result<Option<DataFlow>, CatalogError>;

    /// Flows where the given system is source or target, each id once.
    fn flows_for(&self, system: SystemId) -> Result<Vec<DataFlow>, CatalogError>;

    /// Every stored flow, unique by id.
    fn flows(&self) -> Result<Vec<DataFlow>, CatalogError>;

    /// Delete a flow row. Returns whether a deletion occurred.
    fn delete_flow(&mut self, id: FlowId) -> Result<bool, CatalogError>;

    /// Total number of stored flows.
    fn flow_count(&self) -> Result<usize, CatalogError>;

    // =========================================================================
    // FILTERED VARIANTS (predicates over systems())
    // =========================================================================

    /// Systems with the given lifecycle status.
    fn systems_by_status(
        &self,
        status: SystemStatus,
    ) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(self
            .systems()?
            .into_iter()
            .filter(|s| s.status == status)
            .collect())
    }

    /// Systems with the given deployment kind.
    fn systems_by_kind(&self, kind: SystemKind) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(self
            .systems()?
            .into_iter()
            .filter(|s| s.kind == kind)
            .collect())
    }

    /// Systems owned by the given department.
    fn systems_by_department(
        &self,
        department: &str,
    ) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(self
            .systems()?
            .into_iter()
            .filter(|s| s.owner.department == department)
            .collect())
    }

    /// Systems whose technology stack contains the given entry.
    fn systems_by_technology(
        &self,
        technology: &str,
    ) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(self
            .systems()?
            .into_iter()
            .filter(|s| s.profile.technology_stack.iter().any(|t| t == technology))
            .collect())
    }

    /// Systems supporting the named business function.
    fn systems_by_business_function(
        &self,
        function: &str,
    ) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(self
            .systems()?
            .into_iter()
            .filter(|s| s.business_functions.iter().any(|f| f.name == function))
            .collect())
    }

    /// Systems with at least one high-criticality business function.
    fn critical_systems(&self) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(self
            .systems()?
            .into_iter()
            .filter(|s| {
                s.business_functions
                    .iter()
                    .any(|f| f.criticality == Criticality::High)
            })
            .collect())
    }

    /// Systems that list the given system among their dependents
    /// (reverse lookup through the `dependent_systems` reference list).
    fn dependents_of(&self, id: SystemId) -> Result<Vec<InformationSystem>, CatalogError> {
        Ok(self
            .systems()?
            .into_iter()
            .filter(|s| s.dependent_systems.contains(&id))
            .collect())
    }

    /// The parent of the given system, if any.
    fn parent_of(&self, id: SystemId) -> Result<Option<InformationSystem>, CatalogError> {
        let Some(child) = self.system(id)? else {
            return Ok(None);
        };
        match child.parent_system {
            Some(parent_id) => self.system(parent_id),
            None => Ok(None),
        }
    }
}

// =============================================================================
// IN-MEMORY IMPLEMENTATION
// =============================================================================

/// The in-memory catalog store.
///
/// Uses `BTreeMap` exclusively for deterministic ordering.
/// Volatile: contents are lost when the value is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    /// System records, keyed by id. Stored without flow views.
    systems: BTreeMap<SystemId, InformationSystem>,

    /// Reverse lookup: business code -> system id.
    code_index: BTreeMap<String, SystemId>,

    /// The authoritative flow table, keyed by flow id.
    flows: BTreeMap<FlowId, DataFlow>,
}

impl MemoryCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the flow view for a loaded system.
    fn hydrate(&self, mut system: InformationSystem) -> InformationSystem {
        system.flows = self
            .flows
            .values()
            .filter(|f| f.touches(system.id))
            .cloned()
            .collect();
        system
    }
}

impl CatalogStore for MemoryCatalog {
    fn save_system(
        &mut self,
        mut system: InformationSystem,
    ) -> Result<InformationSystem, CatalogError> {
        if let Some(&holder) = self.code_index.get(&system.code) {
            if holder != system.id {
                return Err(CatalogError::DuplicateCode(system.code));
            }
        }

        // Drop any stale code index entry when the code changed
        if let Some(previous) = self.systems.get(&system.id) {
            if previous.code != system.code {
                self.code_index.remove(&previous.code);
            }
        }

        // The view is derived; never stored
        system.flows = Vec::new();
        self.code_index.insert(system.code.clone(), system.id);
        self.systems.insert(system.id, system.clone());

        Ok(self.hydrate(system))
    }

    fn system(&self, id: SystemId) -> Result<Option<InformationSystem>, CatalogError> {
        Ok(self.systems.get(&id).cloned().map(|s| self.hydrate(s)))
    }

    fn system_by_code(&self, code: &str) -> Result<Option<InformationSystem>, CatalogError> {
        match self.code_index.get(code) {
            Some(&id) => self.system(id),
            None => Ok(None),
        }
    }

    fn systems(&self) -> Result<Vec<InformationSystem>, CatalogError> {
        let mut all: Vec<InformationSystem> = self
            .systems
            .values()
            .cloned()
            .map(|s| self.hydrate(s))
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    fn delete_system(&mut self, id: SystemId) -> Result<bool, CatalogError> {
        match self.systems.remove(&id) {
            Some(system) => {
                self.code_index.remove(&system.code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn contains_system(&self, id: SystemId) -> Result<bool, CatalogError> {
        Ok(self.systems.contains_key(&id))
    }

    fn system_count(&self) -> Result<usize, CatalogError> {
        Ok(self.systems.len())
    }

    fn save_flow(&mut self, flow: DataFlow) -> Result<DataFlow, CatalogError> {
        self.flows.insert(flow.id, flow.clone());
        Ok(flow)
    }

    fn flow(&self, id: FlowId) -> Result<Option<DataFlow>, CatalogError> {
        Ok(self.flows.get(&id).cloned())
    }

    fn flows_for(&self, system: SystemId) -> Result<Vec<DataFlow>, CatalogError> {
        Ok(self
            .flows
            .values()
            .filter(|f| f.touches(system))
            .cloned()
            .collect())
    }

    fn flows(&self) -> Result<Vec<DataFlow>, CatalogError> {
        Ok(self.flows.values().cloned().collect())
    }

    fn delete_flow(&mut self, id: FlowId) -> Result<bool, CatalogError> {
        Ok(self.flows.remove(&id).is_some())
    }

    fn flow_count(&self) -> Result<usize, CatalogError> {
        Ok(self.flows.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FlowDraft, SystemDraft, SystemOwner, TechnicalProfile};

    fn draft(name: &str, code: &str, department: &str) -> SystemDraft {
        SystemDraft {
            name: name.to_string(),
            code: code.to_string(),
            description: String::new(),
            purpose: String::new(),
            owner: SystemOwner {
                name: "Owner".to_string(),
                email: "owner@example.com".to_string(),
                department: department.to_string(),
                phone: None,
            },
            profile: TechnicalProfile {
                technology_stack: vec!["PostgreSQL".to_string()],
                programming_languages: vec![],
                databases: vec![],
                frameworks: vec![],
                deployment_model: "on-premise".to_string(),
                hosting_provider: None,
            },
            business_functions: Vec::new(),
            business_value: String::new(),
            status: SystemStatus::default(),
            kind: SystemKind::default(),
            criticality_class: "Business operational".to_string(),
            cost_center: None,
            parent_system: None,
        }
    }

    fn saved(store: &mut MemoryCatalog, name: &str, code: &str) -> InformationSystem {
        store
            .save_system(InformationSystem::create(draft(name, code, "IT")))
            .expect("save")
    }

    fn flow_between(source: SystemId, target: SystemId) -> DataFlow {
        DataFlow::create(FlowDraft {
            source,
            target,
            data_objects: vec!["Invoice".to_string()],
            integration_technology: "REST".to_string(),
            description: None,
            frequency: "real-time".to_string(),
        })
    }

    #[test]
    fn save_and_load_system() {
        let mut store = MemoryCatalog::new();
        let system = saved(&mut store, "Billing", "BILL-01");

        let loaded = store.system(system.id).expect("load");
        assert_eq!(loaded.as_ref().map(|s| s.code.as_str()), Some("BILL-01"));
        assert!(store.contains_system(system.id).expect("contains"));
        assert_eq!(store.system_count().expect("count"), 1);
    }

    #[test]
    fn code_lookup_and_duplicate_rejection() {
        let mut store = MemoryCatalog::new();
        let system = saved(&mut store, "Billing", "BILL-01");

        let by_code = store.system_by_code("BILL-01").expect("lookup");
        assert_eq!(by_code.map(|s| s.id), Some(system.id));

        let clash = InformationSystem::create(draft("Other", "BILL-01", "IT"));
        assert!(matches!(
            store.save_system(clash),
            Err(CatalogError::DuplicateCode(_))
        ));
    }

    #[test]
    fn code_change_updates_index() {
        let mut store = MemoryCatalog::new();
        let mut system = saved(&mut store, "Billing", "BILL-01");

        system.code = "BILL-02".to_string();
        store.save_system(system).expect("save");

        assert!(store.system_by_code("BILL-01").expect("lookup").is_none());
        assert!(store.system_by_code("BILL-02").expect("lookup").is_some());
    }

    #[test]
    fn systems_ordered_by_name() {
        let mut store = MemoryCatalog::new();
        saved(&mut store, "Zebra", "Z-01");
        saved(&mut store, "Alpha", "A-01");
        saved(&mut store, "Mango", "M-01");

        let names: Vec<String> = store
            .systems()
            .expect("systems")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mango", "Zebra"]);
    }

    #[test]
    fn loaded_view_equals_flows_touching_system() {
        let mut store = MemoryCatalog::new();
        let a = saved(&mut store, "A", "A-01");
        let b = saved(&mut store, "B", "B-01");
        let c = saved(&mut store, "C", "C-01");

        let ab = store.save_flow(flow_between(a.id, b.id)).expect("save");
        let ca = store.save_flow(flow_between(c.id, a.id)).expect("save");

        let loaded = store.system(a.id).expect("load").expect("present");
        let mut view: Vec<FlowId> = loaded.flows.iter().map(|f| f.id).collect();
        view.sort();
        let mut expected = vec![ab.id, ca.id];
        expected.sort();
        assert_eq!(view, expected);

        // Incoming/outgoing split
        assert_eq!(loaded.outgoing_flows().count(), 1);
        assert_eq!(loaded.incoming_flows().count(), 1);
    }

    #[test]
    fn save_system_never_persists_view() {
        let mut store = MemoryCatalog::new();
        let a = saved(&mut store, "A", "A-01");
        let b = saved(&mut store, "B", "B-01");
        store.save_flow(flow_between(a.id, b.id)).expect("save");

        // Re-save the hydrated system; the flow table must stay at one row
        let loaded = store.system(a.id).expect("load").expect("present");
        assert_eq!(loaded.flows.len(), 1);
        store.save_system(loaded).expect("save");

        assert_eq!(store.flow_count().expect("count"), 1);
    }

    #[test]
    fn save_flow_is_idempotent_by_id() {
        let mut store = MemoryCatalog::new();
        let a = saved(&mut store, "A", "A-01");
        let b = saved(&mut store, "B", "B-01");

        let flow = flow_between(a.id, b.id);
        store.save_flow(flow.clone()).expect("save");
        store.save_flow(flow).expect("save");

        assert_eq!(store.flow_count().expect("count"), 1);
    }

    #[test]
    fn self_referential_flow_listed_once() {
        let mut store = MemoryCatalog::new();
        let a = saved(&mut store, "A", "A-01");

        store.save_flow(flow_between(a.id, a.id)).expect("save");

        let flows = store.flows_for(a.id).expect("flows");
        assert_eq!(flows.len(), 1);
    }

    #[test]
    fn delete_flow_is_idempotent() {
        let mut store = MemoryCatalog::new();
        let a = saved(&mut store, "A", "A-01");
        let b = saved(&mut store, "B", "B-01");
        let flow = store.save_flow(flow_between(a.id, b.id)).expect("save");

        assert!(store.delete_flow(flow.id).expect("delete"));
        assert!(!store.delete_flow(flow.id).expect("delete"));
        assert!(store.flows().expect("flows").is_empty());
    }

    #[test]
    fn delete_system_leaves_flows_untouched() {
        // Cascade is a use-case decision; the raw store keeps the rows.
        let mut store = MemoryCatalog::new();
        let a = saved(&mut store, "A", "A-01");
        let b = saved(&mut store, "B", "B-01");
        store.save_flow(flow_between(a.id, b.id)).expect("save");

        assert!(store.delete_system(a.id).expect("delete"));
        assert!(!store.delete_system(a.id).expect("delete"));
        assert_eq!(store.flow_count().expect("count"), 1);
        assert!(store.system_by_code("A-01").expect("lookup").is_none());
    }

    #[test]
    fn filtered_variants_are_predicates_over_all() {
        let mut store = MemoryCatalog::new();
        let mut prod = InformationSystem::create(draft("Prod", "P-01", "Finance"));
        prod.status = SystemStatus::Production;
        store.save_system(prod).expect("save");
        saved(&mut store, "Dev", "D-01");

        let by_status = store
            .systems_by_status(SystemStatus::Production)
            .expect("filter");
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].code, "P-01");

        let by_department = store.systems_by_department("Finance").expect("filter");
        assert_eq!(by_department.len(), 1);

        let by_technology = store.systems_by_technology("PostgreSQL").expect("filter");
        assert_eq!(by_technology.len(), 2);

        assert!(store.systems_by_technology("Kafka").expect("filter").is_empty());

        let by_kind = store.systems_by_kind(SystemKind::Internal).expect("filter");
        assert_eq!(by_kind.len(), 2);
        assert!(store.systems_by_kind(SystemKind::Cloud).expect("filter").is_empty());
    }

    #[test]
    fn business_function_and_criticality_lookups() {
        let mut store = MemoryCatalog::new();
        let mut system = InformationSystem::create(draft("Billing", "BILL-01", "Finance"));
        system.add_business_function(crate::types::BusinessFunction {
            name: "Invoicing".to_string(),
            description: String::new(),
            criticality: Criticality::High,
            business_processes: vec![],
        });
        store.save_system(system).expect("save");
        saved(&mut store, "Plain", "P-01");

        let by_function = store
            .systems_by_business_function("Invoicing")
            .expect("filter");
        assert_eq!(by_function.len(), 1);
        assert_eq!(by_function[0].code, "BILL-01");

        let critical = store.critical_systems().expect("filter");
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].code, "BILL-01");
    }

    #[test]
    fn dependents_and_parent_lookups() {
        let mut store = MemoryCatalog::new();
        let parent = saved(&mut store, "Parent", "PAR-01");

        let mut child_draft = draft("Child", "CHI-01", "IT");
        child_draft.parent_system = Some(parent.id);
        let child = store
            .save_system(InformationSystem::create(child_draft))
            .expect("save");

        let mut upstream = InformationSystem::create(draft("Upstream", "UP-01", "IT"));
        upstream.add_dependent_system(child.id);
        store.save_system(upstream).expect("save");

        let parents = store.parent_of(child.id).expect("parent");
        assert_eq!(parents.map(|p| p.id), Some(parent.id));
        assert!(store.parent_of(parent.id).expect("parent").is_none());

        let dependents = store.dependents_of(child.id).expect("dependents");
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].code, "UP-01");
    }
}
