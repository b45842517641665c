//! Static artifact models.

use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryAssignment, StatsSummary, WorkflowRecord};

/// Workflow records file.
pub const WORKFLOWS_FILE: &str = "workflows.json";
/// Stats file.
pub const STATS_FILE: &str = "stats.json";
/// Sorted category labels file.
pub const CATEGORIES_FILE: &str = "categories.json";
/// filename → category file.
pub const CATEGORY_MAPPINGS_FILE: &str = "category-mappings.json";

/// Everything one generation pass publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    pub workflows: Vec<WorkflowRecord>,
    pub stats: StatsSummary,
    /// Sorted distinct labels
    pub categories: Vec<String>,
    pub category_mappings: CategoryAssignment,
}

impl Artifacts {
    pub fn new(
        workflows: Vec<WorkflowRecord>,
        stats: StatsSummary,
        category_mappings: CategoryAssignment,
    ) -> Self {
        let categories = category_mappings.labels();
        Self {
            workflows,
            stats,
            categories,
            category_mappings,
        }
    }
}
