//! Catalog generation: per-file extraction, categorization and stats.

pub mod classifier;
pub mod extractor;
pub mod generate;
pub mod naming;
pub(crate) mod record;
mod rules;
mod stats;

pub use classifier::Classifier;
pub use extractor::{Extractor, NodeAnalysis};
pub use generate::{GenerationReport, Generator};
pub use record::{CategoryAssignment, Complexity, TriggerType, WorkflowRecord, UNCATEGORIZED};
pub use rules::{
    default_category_rules, AnalysisRules, CategoryRule, ComplexityThresholds, TriggerMarkers,
};
pub use stats::StatsSummary;
