use lod_text::plan::RecordKind;
use thiserror::Error;

/// Fatal rebuild errors. Anything here unwinds the whole run and leaves the
/// graph store partially built; the caller must drop it and rerun.
#[derive(Debug, Error)]
pub enum Error {
  /// A word row names an author abbreviation no author record defines. The
  /// dataset guarantees author references, so this is structural.
  #[error("word {legacy_id} references unknown author {abbreviation:?}")]
  UnknownAuthor { legacy_id: i64, abbreviation: String },

  /// A word row names a type code no type record defines.
  #[error("word {legacy_id} references unknown type {type_code:?}")]
  UnknownType { legacy_id: i64, type_code: String },

  /// A definition row references a legacy word id no word carries.
  #[error("definition references unknown word {legacy_word_id}")]
  UnknownDefinitionWord { legacy_word_id: i64 },

  /// A word row has no spell row at all; without one there is no display
  /// name or event range to build a word from.
  #[error("word {legacy_id} has no spell record")]
  MissingSpell { legacy_id: i64 },

  /// A source file failed to parse; one bad line aborts its whole kind.
  #[error("failed to ingest {kind} records")]
  Ingest {
    kind:   RecordKind,
    #[source]
    source: lod_text::Error,
  },

  #[error(transparent)]
  Core(#[from] lod_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
