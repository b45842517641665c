//! Catalog-wide summary statistics.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::record::{CategoryAssignment, WorkflowRecord};

/// Aggregate counts over every record in a generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Trigger label → count
    pub triggers: BTreeMap<String, usize>,
    /// Complexity label → count
    pub complexity: BTreeMap<String, usize>,
    pub total_nodes: usize,
    pub unique_integrations: usize,
    /// RFC 3339 time of the generation pass
    pub last_indexed: String,
}

impl StatsSummary {
    /// Compute stats stamped with the current time.
    pub fn compute(records: &[WorkflowRecord], categories: &CategoryAssignment) -> Self {
        Self::compute_at(records, categories, Utc::now())
    }

    /// Compute stats stamped with `now`.
    ///
    /// Category assignments are accepted but not counted; the published
    /// stats only cover record fields.
    pub fn compute_at(
        records: &[WorkflowRecord],
        _categories: &CategoryAssignment,
        now: DateTime<Utc>,
    ) -> Self {
        let active = records.iter().filter(|r| r.active).count();

        let mut triggers = BTreeMap::new();
        let mut complexity = BTreeMap::new();
        let mut integrations = HashSet::new();
        let mut total_nodes = 0;

        for record in records {
            *triggers
                .entry(record.trigger_type.to_string())
                .or_insert(0) += 1;
            *complexity
                .entry(record.complexity.to_string())
                .or_insert(0) += 1;
            total_nodes += record.node_count;
            integrations.extend(record.integrations.iter().map(String::as_str));
        }

        Self {
            total: records.len(),
            active,
            inactive: records.len() - active,
            triggers,
            complexity,
            total_nodes,
            unique_integrations: integrations.len(),
            last_indexed: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
