//! Workflow documents: types, parsing, diagrams and file annotation.
//!
//! Workflow files are n8n-style JSON exports consisting of:
//! - Nodes: the steps, each with an optional name and type marker
//! - Connections: source node → output slot → target nodes

pub mod annotate;
pub mod diagram;
mod parser;
mod types;

pub use annotate::{list_json_files, AnnotateReport, Annotator};
pub use parser::{parse_workflow, parse_workflow_file};
pub use types::*;
