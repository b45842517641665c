//! Writes generation artifacts to a static data directory.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use super::models::{
    Artifacts, CATEGORIES_FILE, CATEGORY_MAPPINGS_FILE, STATS_FILE, WORKFLOWS_FILE,
};
use crate::error::{Error, Result};

/// Whole-file writer for the static data directory.
///
/// Each artifact replaces its file outright. The four files are written
/// one after another with no transaction across them.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    pretty: bool,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: false,
        }
    }

    /// Indent output for humans instead of minifying it.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Create the output directory if needed and write all artifacts.
    pub fn write(&self, artifacts: &Artifacts) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Storage(format!(
                "Cannot create output directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let written = vec![
            self.write_json(WORKFLOWS_FILE, &artifacts.workflows)?,
            self.write_json(STATS_FILE, &artifacts.stats)?,
            self.write_json(CATEGORIES_FILE, &artifacts.categories)?,
            self.write_json(CATEGORY_MAPPINGS_FILE, &artifacts.category_mappings)?,
        ];

        info!(
            dir = %self.dir.display(),
            workflows = artifacts.workflows.len(),
            categories = artifacts.categories.len(),
            "Wrote static artifacts"
        );
        Ok(written)
    }

    fn write_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(file);
        let content = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        std::fs::write(&path, &content).map_err(|e| {
            Error::Storage(format!("Cannot write {}: {}", path.display(), e))
        })?;
        debug!(file = %path.display(), bytes = content.len(), "Wrote artifact");
        Ok(path)
    }
}
