//! Core types for the LOD lexical database engine.
//!
//! This crate is deliberately free of I/O and storage dependencies.
//! All other crates depend on it; it depends only on chrono, serde and
//! thiserror.

pub mod author;
pub mod definition;
pub mod error;
pub mod event;
pub mod key;
pub mod source;
pub mod support;
pub mod word;
pub mod word_type;

pub use error::{Error, Result};

/// Row identity for a [`word::Word`]. Assigned once at ingestion, dense and
/// 1-based within a rebuilt dataset.
pub type WordId = i64;
/// Row identity for a [`word_type::WordType`].
pub type TypeId = i64;
/// Row identity for an [`author::Author`].
pub type AuthorId = i64;
/// Identity of an [`event::Event`]. Event ids come from the source data and
/// encode the historical ordering of lexical events; "latest" = max id.
pub type EventId = i64;
/// Row identity for a [`definition::Definition`].
pub type DefinitionId = i64;
/// Row identity for a [`key::Key`].
pub type KeyId = i64;
