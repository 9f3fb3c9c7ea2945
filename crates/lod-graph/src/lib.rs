//! In-memory graph store for the LOD lexical database.
//!
//! Holds the canonical entities plus the three relationship edge sets
//! (word→authors, parent→children, definition→keys), each maintained in
//! both directions inside a single call. All inserts are idempotent;
//! traversal queries return results ordered by target display name so
//! downstream consumers (exporters, renderers) see a deterministic order.

pub mod repo;
pub mod store;

pub use repo::GraphRepository;
pub use store::{DerivativeFilter, GraphStore};

#[cfg(test)]
mod tests;
