//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use std::path::{Path, PathBuf};
use sysmap_core::{Catalog, CatalogError, SearchFilter, SystemId, SystemStatus};

/// Open the catalog with the requested backend.
fn load_or_create_catalog(db_path: &Path, backend: &str) -> Result<Catalog, CatalogError> {
    match backend {
        "memory" => Ok(Catalog::new()),
        "redb" => Catalog::with_redb(db_path),
        other => Err(CatalogError::InvalidArgument(format!(
            "unknown backend '{other}' (expected 'redb' or 'memory')"
        ))),
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &PathBuf,
    backend: &str,
    host: &str,
    port: u16,
) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;

    println!("Sysmap Catalog Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", backend);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  GET    /systems              - List systems");
    println!("  POST   /systems              - Catalog a system");
    println!("  POST   /systems/search       - Filtered search");
    println!("  GET    /dataflows            - List dataflows");
    println!("  POST   /dataflows            - Create a dataflow");
    println!("  GET    /statistics           - Statistics rollup");
    println!("  GET    /health               - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, catalog).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show catalog status.
pub fn cmd_status(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;
    let systems = catalog.system_count()?;
    let flows = catalog.flows()?.len();

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": backend,
            "persistent": catalog.is_persistent(),
            "system_count": systems,
            "dataflow_count": flows,
        });
        println!("{output}");
    } else {
        println!("Catalog Status");
        println!("  Database:  {:?}", db_path);
        println!("  Backend:   {}", backend);
        println!("  Systems:   {}", systems);
        println!("  Dataflows: {}", flows);
    }
    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List cataloged systems.
pub fn cmd_list(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;
    let systems = catalog.systems()?;

    if json_mode {
        let output: Vec<serde_json::Value> = systems
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id.to_string(),
                    "code": s.code,
                    "name": s.name,
                    "status": s.status.as_str(),
                    "type": s.kind.as_str(),
                    "critical": s.is_critical(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| CatalogError::Storage(e.to_string()))?
        );
        return Ok(());
    }

    if systems.is_empty() {
        println!("Catalog is empty");
        return Ok(());
    }

    println!("{:<12} {:<30} {:<12} {:<10}", "CODE", "NAME", "STATUS", "TYPE");
    for system in &systems {
        println!(
            "{:<12} {:<30} {:<12} {:<10}",
            system.code,
            system.name,
            system.status.as_str(),
            system.kind.as_str()
        );
    }
    println!();
    println!("{} system(s)", systems.len());
    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show one system by id or business code.
pub fn cmd_show(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    reference: &str,
) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;

    // Accept either a UUID or a business code
    let system = match SystemId::parse(reference) {
        Ok(id) => catalog.system(id)?,
        Err(_) => catalog.system_by_code(reference)?,
    };

    let Some(system) = system else {
        return Err(CatalogError::InvalidArgument(format!(
            "no system with id or code '{reference}'"
        )));
    };

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&system)
                .map_err(|e| CatalogError::Storage(e.to_string()))?
        );
        return Ok(());
    }

    println!("{} ({})", system.name, system.code);
    println!("  Id:          {}", system.id);
    println!("  Status:      {}", system.status);
    println!("  Type:        {}", system.kind);
    println!("  Department:  {}", system.owner.department);
    println!("  Owner:       {} <{}>", system.owner.name, system.owner.email);
    println!("  Version:     {}", system.version);
    println!("  Criticality: {}", system.criticality_class);
    println!("  Critical:    {}", system.is_critical());
    println!("  Stack:       {}", system.technology_summary());
    if let Some(parent) = system.parent_system {
        println!("  Parent:      {parent}");
    }
    println!("  Dataflows:   {}", system.flows.len());
    for flow in &system.flows {
        let direction = if flow.source == system.id { "->" } else { "<-" };
        let peer = if flow.source == system.id {
            flow.target
        } else {
            flow.source
        };
        println!(
            "    {} {} [{}] {} ({})",
            direction,
            peer,
            flow.integration_technology,
            flow.data_objects.join(", "),
            flow.frequency
        );
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Search the catalog with AND-combined filters.
pub fn cmd_search(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    query: Option<String>,
    status: Option<String>,
    department: Option<String>,
    technology: Option<String>,
) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;

    let status = match status {
        Some(s) => Some(SystemStatus::parse(&s)?),
        None => None,
    };

    let filter = SearchFilter {
        query,
        status,
        kind: None,
        department,
        technology,
        criticality: None,
    };
    let hits = catalog.search(&filter)?;

    if json_mode {
        let output: Vec<serde_json::Value> = hits
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id.to_string(),
                    "code": s.code,
                    "name": s.name,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| CatalogError::Storage(e.to_string()))?
        );
        return Ok(());
    }

    for system in &hits {
        println!("{:<12} {}", system.code, system.name);
    }
    println!();
    println!("{} match(es)", hits.len());
    Ok(())
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Show the statistics rollup.
pub fn cmd_stats(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;
    let stats = catalog.statistics()?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats)
                .map_err(|e| CatalogError::Storage(e.to_string()))?
        );
        return Ok(());
    }

    println!("Catalog Statistics");
    println!("  Total systems:      {}", stats.total_systems);
    println!("    Development:      {}", stats.development_systems);
    println!("    Production:       {}", stats.production_systems);
    println!("    Deprecated:       {}", stats.deprecated_systems);
    println!("  Critical systems:   {}", stats.critical_systems);
    println!("  Dataflows:          {}", stats.total_flows);
    println!("  By department:");
    for (department, count) in &stats.systems_by_department {
        println!("    {:<18} {}", department, count);
    }
    println!("  Top technologies:");
    for entry in &stats.top_technologies {
        println!("    {:<18} {}", entry.technology, entry.count);
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty database.
pub fn cmd_init(db_path: &PathBuf, backend: &str, force: bool) -> Result<(), CatalogError> {
    if backend != "redb" {
        return Err(CatalogError::InvalidArgument(
            "init only applies to the redb backend".into(),
        ));
    }

    if db_path.exists() {
        if !force {
            return Err(CatalogError::InvalidArgument(format!(
                "database {:?} already exists (use --force to overwrite)",
                db_path
            )));
        }
        std::fs::remove_file(db_path).map_err(|e| CatalogError::Storage(e.to_string()))?;
    }

    let catalog = Catalog::with_redb(db_path)?;
    println!(
        "Initialized empty catalog at {:?} ({} systems)",
        db_path,
        catalog.system_count()?
    );
    Ok(())
}
