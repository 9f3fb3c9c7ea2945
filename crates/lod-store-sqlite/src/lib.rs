//! SQLite backend for the LOD lexical graph.
//!
//! Persists a fully linked [`lod_graph::GraphStore`] through the
//! [`lod_graph::GraphRepository`] contract. Writes are grouped into one
//! transaction per entity or edge kind, so a mid-batch failure rolls back
//! only that kind and leaves earlier-committed kinds intact.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
