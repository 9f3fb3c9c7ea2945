//! Rebuilds the LOD lexical graph from flat source records.
//!
//! The pipeline: fetch and parse the source tables into a [`SourceSet`],
//! ingest them into a [`lod_graph::GraphStore`], then run the four linking
//! passes (authors, derivatives, affixes, keys) in order. The outcome is a
//! [`LinkReport`] of counters and structured data-quality warnings.
//!
//! Fatal errors (malformed records, unresolved author/type references)
//! unwind the whole rebuild and leave the store partially built; the only
//! supported recovery is a rerun from a fresh store.

pub mod error;
pub mod export;
pub mod ingest;
pub mod linker;
pub mod origin;
pub mod report;

pub use error::{Error, Result};
pub use ingest::SourceSet;
pub use linker::{KeyLinking, LinkOptions, rebuild, rebuild_with};
pub use report::{LinkReport, LinkWarning};
