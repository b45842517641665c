//! Translation scaffolding for workflow files.
//!
//! Adds an empty `description` and a `translations.<lang>` stub seeded
//! from the current name and description, then rewrites the file in
//! place. Existing values are never overwritten.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Outcome of one annotation run over a directory.
#[derive(Debug, Default, Clone, Serialize)]
pub struct AnnotateReport {
    pub processed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Adds translation stubs for a single target language.
#[derive(Debug, Clone)]
pub struct Annotator {
    language: String,
}

impl Annotator {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Add missing fields to a parsed document.
    ///
    /// Fails when the document is not an object or has no `name`, in which
    /// case the document is left as it was.
    pub fn annotate_value(&self, doc: &mut Value) -> Result<()> {
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| Error::Workflow("document is not a JSON object".to_string()))?;

        let name = obj
            .get("name")
            .cloned()
            .ok_or_else(|| Error::Workflow("missing field 'name'".to_string()))?;

        let description = obj
            .entry("description")
            .or_insert_with(|| Value::String(String::new()))
            .clone();

        if !obj.contains_key("translations") {
            let mut entry = Map::new();
            entry.insert("name".to_string(), name);
            entry.insert("description".to_string(), description);

            let mut translations = Map::new();
            translations.insert(self.language.clone(), Value::Object(entry));
            obj.insert("translations".to_string(), Value::Object(translations));
        }

        Ok(())
    }

    /// Annotate one file in place.
    pub fn annotate_file(&self, path: &Path) -> Result<()> {
        let content = std::fs::read(path)?;
        let mut doc: Value = serde_json::from_slice(&content)?;
        self.annotate_value(&mut doc)?;
        let rendered = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, rendered)?;
        Ok(())
    }

    /// Annotate every `.json` file directly under `dir`.
    ///
    /// A failing file is logged and recorded; the rest are still processed.
    pub fn annotate_dir(&self, dir: &Path) -> Result<AnnotateReport> {
        let mut report = AnnotateReport::default();

        for path in list_json_files(dir)? {
            let file = file_name(&path);
            match self.annotate_file(&path) {
                Ok(()) => {
                    info!(file = %file, "Processed");
                    report.processed.push(file);
                }
                Err(e) => {
                    warn!(file = %file, error = %e, "Error processing workflow");
                    report.failed.push((file, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new("fa")
    }
}

/// Files ending in `.json` directly under `dir`, sorted by name.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Workflow(format!(
            "Workflows directory not found: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
