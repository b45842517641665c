//! Reads static artifacts back for the query engine.

use std::path::Path;

use serde::de::DeserializeOwned;

use super::models::{
    Artifacts, CATEGORIES_FILE, CATEGORY_MAPPINGS_FILE, STATS_FILE, WORKFLOWS_FILE,
};
use crate::catalog::{CategoryAssignment, StatsSummary, WorkflowRecord};
use crate::error::{Error, Result};

/// Load all four artifacts from `dir`.
///
/// Any missing or corrupt file fails the whole load; there is no partial
/// catalog.
pub fn load_artifacts(dir: &Path) -> Result<Artifacts> {
    let workflows: Vec<WorkflowRecord> = read_json(dir, WORKFLOWS_FILE)?;
    let stats: StatsSummary = read_json(dir, STATS_FILE)?;
    let categories: Vec<String> = read_json(dir, CATEGORIES_FILE)?;
    let category_mappings: CategoryAssignment = read_json(dir, CATEGORY_MAPPINGS_FILE)?;

    Ok(Artifacts {
        workflows,
        stats,
        categories,
        category_mappings,
    })
}

/// Load only the records and the category mapping.
pub fn load_records(dir: &Path) -> Result<(Vec<WorkflowRecord>, CategoryAssignment)> {
    Ok((
        read_json(dir, WORKFLOWS_FILE)?,
        read_json(dir, CATEGORY_MAPPINGS_FILE)?,
    ))
}

pub fn load_stats(dir: &Path) -> Result<StatsSummary> {
    read_json(dir, STATS_FILE)
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let content = std::fs::read(&path)
        .map_err(|e| Error::Catalog(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_slice(&content)
        .map_err(|e| Error::Catalog(format!("Corrupt artifact {}: {}", path.display(), e)))
}
