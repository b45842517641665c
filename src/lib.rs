//! flowdex - static catalog generator for n8n workflow exports
//!
//! flowdex scans a directory of exported workflow JSON files, derives a
//! searchable record for each one, groups them into categories and writes
//! a small set of static JSON artifacts. A front end (or the bundled CLI)
//! loads those artifacts and filters them in memory.
//!
//! ## Pipeline
//!
//! - **Extract**: one [`catalog::WorkflowRecord`] per file (name, trigger,
//!   complexity, integrations, fingerprint)
//! - **Classify**: first matching keyword rule assigns a category
//! - **Aggregate**: counts per trigger and complexity
//! - **Emit**: `workflows.json`, `stats.json`, `categories.json`,
//!   `category-mappings.json`
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use flowdex::catalog::Generator;
//! use flowdex::query::{Catalog, QueryState};
//! use flowdex::storage::ArtifactWriter;
//!
//! # fn main() -> flowdex::Result<()> {
//! let out = Path::new("static/data");
//! Generator::default().run(Path::new("workflows"), &ArtifactWriter::new(out))?;
//!
//! let catalog = Catalog::load(out)?;
//! let hits = catalog.filter(&QueryState::search("slack").with_trigger("Webhook"));
//! println!("{} matches", hits.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod storage;
pub mod workflow;

pub use error::{Error, Result};
