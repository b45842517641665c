//! The offline generation pass.
//!
//! Extract → classify → aggregate → emit, single-threaded, one file at a
//! time. Every record is built before anything is written.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::classifier::Classifier;
use super::extractor::Extractor;
use super::stats::StatsSummary;
use crate::error::{ErrorResponse, Result};
use crate::storage::{ArtifactWriter, Artifacts};
use crate::workflow::annotate::file_name;
use crate::workflow::list_json_files;

/// Summary of a generation pass.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub processed: usize,
    pub skipped: Vec<ErrorResponse>,
    pub categories: Vec<String>,
    pub stats: StatsSummary,
}

/// Wires the extractor and classifier together over a directory.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    extractor: Extractor,
    classifier: Classifier,
}

impl Generator {
    pub fn new(extractor: Extractor, classifier: Classifier) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    /// Build the artifacts for every `.json` file under `input_dir`.
    ///
    /// Unreadable or malformed files are logged and left out. Any other
    /// error aborts the pass before anything is written.
    pub fn build(&self, input_dir: &Path) -> Result<(Artifacts, Vec<ErrorResponse>)> {
        let files = list_json_files(input_dir)?;
        info!(dir = %input_dir.display(), files = files.len(), "Scanning workflows");

        let mut records = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();

        for path in &files {
            match self.extractor.extract_file(path) {
                Ok(record) => records.push(record),
                Err(e) if !e.is_per_file() => return Err(e),
                Err(e) => {
                    let file = file_name(path);
                    warn!(file = %file, error = %e, "Skipping workflow");
                    skipped.push(ErrorResponse::from(&e).with_file(&file));
                }
            }
        }

        let mappings = self.classifier.assign(&records);
        let stats = StatsSummary::compute(&records, &mappings);
        Ok((Artifacts::new(records, stats, mappings), skipped))
    }

    /// Build the artifacts and write them to `writer`'s directory.
    pub fn run(&self, input_dir: &Path, writer: &ArtifactWriter) -> Result<GenerationReport> {
        let (artifacts, skipped) = self.build(input_dir)?;
        writer.write(&artifacts)?;

        info!(
            processed = artifacts.workflows.len(),
            skipped = skipped.len(),
            "Generation complete"
        );

        Ok(GenerationReport {
            processed: artifacts.workflows.len(),
            skipped,
            categories: artifacts.categories,
            stats: artifacts.stats,
        })
    }
}
