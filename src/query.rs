//! Catalog query engine.
//!
//! Loads the static artifacts once and answers filter queries by scanning
//! the whole record list every time. Results keep the input order.
//!
//! ## Example
//!
//! ```json
//! {
//!   "searchQuery": "slack",
//!   "filters": {
//!     "trigger": "Webhook",
//!     "complexity": "all",
//!     "category": "all",
//!     "activeOnly": true
//!   }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryAssignment, StatsSummary, WorkflowRecord};
use crate::error::Result;
use crate::storage::{load_artifacts, Artifacts};
use crate::workflow::diagram;

/// Filter value meaning "no constraint".
pub const ALL: &str = "all";

/// Shown when a record cannot be rendered as JSON.
pub const JSON_PLACEHOLDER: &str = "Error generating JSON";

/// Enum filters plus the active-only switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default = "all")]
    pub trigger: String,
    #[serde(default = "all")]
    pub complexity: String,
    #[serde(default = "all")]
    pub category: String,
    #[serde(default)]
    pub active_only: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            trigger: all(),
            complexity: all(),
            category: all(),
            active_only: false,
        }
    }
}

fn all() -> String {
    ALL.to_string()
}

/// Current search box and filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub filters: Filters,
}

impl QueryState {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.filters.trigger = trigger.into();
        self
    }

    pub fn with_complexity(mut self, complexity: impl Into<String>) -> Self {
        self.filters.complexity = complexity.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.filters.category = category.into();
        self
    }

    pub fn active_only(mut self, active_only: bool) -> Self {
        self.filters.active_only = active_only;
        self
    }
}

/// Does `record` pass every predicate in `state`?
///
/// Predicates run in a fixed order and stop at the first failure: text,
/// trigger, complexity, category, active flag.
pub fn matches(record: &WorkflowRecord, mappings: &CategoryAssignment, state: &QueryState) -> bool {
    let needle = state.search_query.to_lowercase();
    matches_prepared(record, mappings, &needle, &state.filters)
}

fn matches_prepared(
    record: &WorkflowRecord,
    mappings: &CategoryAssignment,
    needle: &str,
    filters: &Filters,
) -> bool {
    if !needle.is_empty() && !record.matches_text(needle) {
        return false;
    }
    if filters.trigger != ALL && record.trigger_type.as_str() != filters.trigger {
        return false;
    }
    if filters.complexity != ALL && record.complexity.as_str() != filters.complexity {
        return false;
    }
    if filters.category != ALL && mappings.category_of(&record.filename) != filters.category {
        return false;
    }
    if filters.active_only && !record.active {
        return false;
    }
    true
}

/// Filter `records`, keeping their order.
pub fn filter_records<'a>(
    records: &'a [WorkflowRecord],
    mappings: &CategoryAssignment,
    state: &QueryState,
) -> Vec<&'a WorkflowRecord> {
    let needle = state.search_query.to_lowercase();
    records
        .iter()
        .filter(|r| matches_prepared(r, mappings, &needle, &state.filters))
        .collect()
}

/// Read-only in-memory catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<WorkflowRecord>,
    mappings: CategoryAssignment,
    categories: Vec<String>,
    stats: StatsSummary,
}

impl Catalog {
    /// Load from a static data directory. Any load failure is final.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self::from_artifacts(load_artifacts(dir)?))
    }

    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self {
            records: artifacts.workflows,
            mappings: artifacts.category_mappings,
            categories: artifacts.categories,
            stats: artifacts.stats,
        }
    }

    pub fn records(&self) -> &[WorkflowRecord] {
        &self.records
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn stats(&self) -> &StatsSummary {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, state: &QueryState) -> Vec<&WorkflowRecord> {
        filter_records(&self.records, &self.mappings, state)
    }

    pub fn get(&self, filename: &str) -> Option<&WorkflowRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    pub fn category_of(&self, record: &WorkflowRecord) -> &str {
        self.mappings.category_of(&record.filename)
    }

    /// Number of records per category label, in label order.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.categories
            .iter()
            .map(|label| {
                let count = self
                    .records
                    .iter()
                    .filter(|r| self.category_of(r) == label)
                    .count();
                (label.clone(), count)
            })
            .collect()
    }

    /// Everything the detail view shows for one record.
    pub fn detail(&self, filename: &str) -> Option<WorkflowDetail> {
        let record = self.get(filename)?;
        Some(WorkflowDetail {
            category: self.category_of(record).to_string(),
            diagram: diagram::render_or_placeholder(&record.nodes, &record.connections),
            json: record_json(record),
            record: record.clone(),
        })
    }
}

/// Detail view payload for a single workflow.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDetail {
    pub record: WorkflowRecord,
    pub category: String,
    pub diagram: String,
    pub json: String,
}

/// Pretty JSON of the record's source shape, or a placeholder.
pub fn record_json(record: &WorkflowRecord) -> String {
    let doc = serde_json::json!({
        "name": record.name,
        "nodes": record.nodes,
        "connections": record.connections,
        "active": record.active,
    });
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| JSON_PLACEHOLDER.to_string())
}
