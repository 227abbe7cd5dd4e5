//! # sysmap-core
//!
//! The deterministic catalog engine for Sysmap - THE CATALOG.
//!
//! This crate implements the domain model and storage for an enterprise
//! information-system catalog: systems (nodes), the dataflows between
//! them (directed edges), and the query layer over both.
//!
//! ## Edge Ownership
//!
//! The one invariant this crate exists to protect: a dataflow is
//! reachable from both of its endpoint systems, yet stored exactly once,
//! keyed by its own id. System records never persist their flow views;
//! the views are recomputed from the flow table on every load.
//!
//! ## Architectural Constraints
//!
//! - Is the ONLY place where catalog state exists (stateful)
//! - Is pure Rust: no async, no network dependencies
//! - Is deterministic: BTreeMap ordering, no floats

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod flows;
pub mod primitives;
pub mod query;
pub mod storage;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    BusinessFunction, CatalogError, Criticality, DataFlow, FlowDraft, FlowId, FlowPatch,
    InformationSystem, SystemDraft, SystemId, SystemKind, SystemOwner, SystemStatus,
    TechnicalProfile,
};

// =============================================================================
// RE-EXPORTS: Store & Engine
// =============================================================================

pub use catalog::{Catalog, StorageBackend};
pub use flows::FlowEngine;
pub use query::{CatalogStatistics, SearchFilter, TechnologyCount, search, statistics};
pub use storage::RedbCatalog;
pub use store::{CatalogStore, MemoryCatalog};
