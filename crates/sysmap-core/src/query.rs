//! # Query Module
//!
//! Pure read-side computation over loaded systems: AND-combined filtered
//! search and the statistics rollup. No mutation, no failure modes beyond
//! empty results.

use crate::primitives::TOP_TECHNOLOGIES;
use crate::types::{Criticality, InformationSystem, SystemKind, SystemStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// SEARCH
// =============================================================================

/// Filter set for system search. Filters AND-combine; `query` is a
/// case-insensitive substring match on name, description, and code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub status: Option<SystemStatus>,
    #[serde(default)]
    pub kind: Option<SystemKind>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub technology: Option<String>,
    #[serde(default)]
    pub criticality: Option<Criticality>,
}

impl SearchFilter {
    /// An empty filter that matches every system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given system passes every supplied filter.
    #[must_use]
    pub fn matches(&self, system: &InformationSystem) -> bool {
        if let Some(status) = self.status {
            if system.status != status {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if system.kind != kind {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if &system.owner.department != department {
                return false;
            }
        }
        if let Some(technology) = &self.technology {
            if !system
                .profile
                .technology_stack
                .iter()
                .any(|t| t == technology)
            {
                return false;
            }
        }
        if let Some(criticality) = self.criticality {
            if !system
                .business_functions
                .iter()
                .any(|f| f.criticality == criticality)
            {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let needle = query.to_lowercase();
            let hit = system.name.to_lowercase().contains(&needle)
                || system.description.to_lowercase().contains(&needle)
                || system.code.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Apply a filter to a loaded system list, preserving input order.
#[must_use]
pub fn search(systems: &[InformationSystem], filter: &SearchFilter) -> Vec<InformationSystem> {
    systems
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect()
}

// =============================================================================
// STATISTICS
// =============================================================================

/// One entry of the top-technologies rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyCount {
    pub technology: String,
    pub count: usize,
}

/// Statistics rollup over the whole catalog.
///
/// Maps use `BTreeMap` so the serialized output is deterministically
/// ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub total_systems: usize,
    pub development_systems: usize,
    pub production_systems: usize,
    pub deprecated_systems: usize,
    pub critical_systems: usize,
    pub total_flows: usize,
    pub systems_by_kind: BTreeMap<String, usize>,
    pub systems_by_department: BTreeMap<String, usize>,
    pub top_technologies: Vec<TechnologyCount>,
}

/// Compute the statistics rollup from a loaded system list.
///
/// Top technologies are the ten most used stack entries, ordered by
/// count descending with name ascending as the stable tie-breaker.
#[must_use]
pub fn statistics(systems: &[InformationSystem], total_flows: usize) -> CatalogStatistics {
    let mut stats = CatalogStatistics {
        total_systems: systems.len(),
        total_flows,
        ..CatalogStatistics::default()
    };

    let mut technology_count: BTreeMap<&str, usize> = BTreeMap::new();

    for system in systems {
        match system.status {
            SystemStatus::Development => stats.development_systems += 1,
            SystemStatus::Production => stats.production_systems += 1,
            SystemStatus::Deprecated => stats.deprecated_systems += 1,
        }
        if system.is_critical() {
            stats.critical_systems += 1;
        }

        *stats
            .systems_by_kind
            .entry(system.kind.as_str().to_string())
            .or_default() += 1;
        *stats
            .systems_by_department
            .entry(system.owner.department.clone())
            .or_default() += 1;

        for technology in &system.profile.technology_stack {
            *technology_count.entry(technology.as_str()).or_default() += 1;
        }
    }

    // BTreeMap iteration is name-ascending, and the sort is stable, so
    // equal counts keep that order.
    let mut ranked: Vec<TechnologyCount> = technology_count
        .into_iter()
        .map(|(technology, count)| TechnologyCount {
            technology: technology.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(TOP_TECHNOLOGIES);
    stats.top_technologies = ranked;

    stats
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        BusinessFunction, InformationSystem, SystemDraft, SystemOwner, TechnicalProfile,
    };

    fn system(
        name: &str,
        code: &str,
        status: SystemStatus,
        kind: SystemKind,
        department: &str,
        stack: &[&str],
    ) -> InformationSystem {
        let mut s = InformationSystem::create(SystemDraft {
            name: name.to_string(),
            code: code.to_string(),
            description: format!("{name} description"),
            purpose: String::new(),
            owner: SystemOwner {
                name: "Owner".to_string(),
                email: "owner@example.com".to_string(),
                department: department.to_string(),
                phone: None,
            },
            profile: TechnicalProfile {
                technology_stack: stack.iter().map(|t| t.to_string()).collect(),
                programming_languages: vec![],
                databases: vec![],
                frameworks: vec![],
                deployment_model: "on-premise".to_string(),
                hosting_provider: None,
            },
            business_functions: Vec::new(),
            business_value: String::new(),
            status: SystemStatus::default(),
            kind,
            criticality_class: "Business operational".to_string(),
            cost_center: None,
            parent_system: None,
        });
        s.status = status;
        s
    }

    fn fixture() -> Vec<InformationSystem> {
        let mut erp = system(
            "ERP Core",
            "ERP-01",
            SystemStatus::Production,
            SystemKind::Internal,
            "Finance",
            &["SAP", "Oracle"],
        );
        erp.add_business_function(BusinessFunction {
            name: "General Ledger".to_string(),
            description: String::new(),
            criticality: Criticality::High,
            business_processes: vec![],
        });

        let crm = system(
            "CRM",
            "CRM-01",
            SystemStatus::Production,
            SystemKind::Cloud,
            "Sales",
            &["Salesforce", "Oracle"],
        );
        let lab = system(
            "Data Lab",
            "LAB-01",
            SystemStatus::Development,
            SystemKind::Internal,
            "Finance",
            &["Spark"],
        );
        vec![erp, crm, lab]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let systems = fixture();
        assert_eq!(search(&systems, &SearchFilter::new()).len(), systems.len());
    }

    #[test]
    fn filters_and_combine() {
        let systems = fixture();
        let filter = SearchFilter {
            status: Some(SystemStatus::Production),
            department: Some("Finance".to_string()),
            ..SearchFilter::default()
        };

        let hits = search(&systems, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "ERP-01");
    }

    #[test]
    fn text_query_is_case_insensitive_substring() {
        let systems = fixture();
        let filter = SearchFilter {
            query: Some("erp".to_string()),
            ..SearchFilter::default()
        };
        assert_eq!(search(&systems, &filter).len(), 1);

        let filter = SearchFilter {
            query: Some("CRM-0".to_string()),
            ..SearchFilter::default()
        };
        assert_eq!(search(&systems, &filter).len(), 1);

        let filter = SearchFilter {
            query: Some("description".to_string()),
            ..SearchFilter::default()
        };
        assert_eq!(search(&systems, &filter).len(), 3);
    }

    #[test]
    fn technology_filter_requires_exact_stack_entry() {
        let systems = fixture();
        let filter = SearchFilter {
            technology: Some("Oracle".to_string()),
            ..SearchFilter::default()
        };
        assert_eq!(search(&systems, &filter).len(), 2);

        let filter = SearchFilter {
            technology: Some("Orac".to_string()),
            ..SearchFilter::default()
        };
        assert!(search(&systems, &filter).is_empty());
    }

    #[test]
    fn criticality_filter_inspects_business_functions() {
        let systems = fixture();
        let filter = SearchFilter {
            criticality: Some(Criticality::High),
            ..SearchFilter::default()
        };
        let hits = search(&systems, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "ERP-01");
    }

    #[test]
    fn statistics_counts_by_status_sum_to_total() {
        let systems = fixture();
        let stats = statistics(&systems, 0);

        assert_eq!(stats.total_systems, 3);
        assert_eq!(
            stats.development_systems + stats.production_systems + stats.deprecated_systems,
            stats.total_systems
        );
        assert_eq!(stats.critical_systems, 1);
        assert_eq!(stats.systems_by_kind.get("internal"), Some(&2));
        assert_eq!(stats.systems_by_kind.get("cloud"), Some(&1));
        assert_eq!(stats.systems_by_department.get("Finance"), Some(&2));
    }

    #[test]
    fn top_technologies_ranked_with_stable_ties() {
        let systems = fixture();
        let stats = statistics(&systems, 0);

        // Oracle appears twice; the singletons tie and fall back to
        // name-ascending order.
        assert_eq!(stats.top_technologies[0].technology, "Oracle");
        assert_eq!(stats.top_technologies[0].count, 2);
        let singles: Vec<&str> = stats.top_technologies[1..]
            .iter()
            .map(|t| t.technology.as_str())
            .collect();
        assert_eq!(singles, vec!["SAP", "Salesforce", "Spark"]);
    }

    #[test]
    fn top_technologies_truncates_to_ten() {
        let mut systems = Vec::new();
        for i in 0..15 {
            let tech = format!("tech-{i:02}");
            systems.push(system(
                &format!("S{i}"),
                &format!("S-{i}"),
                SystemStatus::Development,
                SystemKind::Internal,
                "IT",
                &[tech.as_str()],
            ));
        }
        let stats = statistics(&systems, 0);
        assert_eq!(stats.top_technologies.len(), 10);
    }
}
