//! Static artifact storage.
//!
//! Generation writes four JSON files into one directory; the query side
//! reads them back. There is no database and no incremental update.

mod emitter;
mod loader;
mod models;

pub use emitter::ArtifactWriter;
pub use loader::{load_artifacts, load_records, load_stats};
pub use models::*;
