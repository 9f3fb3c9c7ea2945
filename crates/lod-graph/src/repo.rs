//! [`GraphRepository`] — the seam between the in-memory graph and a
//! persistence backend.

use crate::store::GraphStore;

/// A persistence backend for the lexical graph.
///
/// `persist` writes the full graph in one logical operation; each backend
/// groups its writes so a failure leaves at most one entity or edge kind
/// partially written, and `restore` after a failed `persist` is undefined
/// until the next successful one.
pub trait GraphRepository {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the backend's storage structures. Idempotent.
  fn create_all(&mut self) -> Result<(), Self::Error>;

  /// Destroy the backend's storage structures and all data.
  fn drop_all(&mut self) -> Result<(), Self::Error>;

  /// Write the full contents of `store`, replacing whatever was persisted
  /// before.
  fn persist(&mut self, store: &GraphStore) -> Result<(), Self::Error>;

  /// Load a previously persisted graph into a fresh store.
  fn restore(&mut self) -> Result<GraphStore, Self::Error>;
}
