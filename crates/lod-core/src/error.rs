//! Error types for `lod-core`.
//!
//! Construction errors only — everything here is fatal for the entity being
//! built. Non-fatal data-quality findings live in the linker's report, not
//! in this enum.

use thiserror::Error;

use crate::{EventId, WordId};

#[derive(Debug, Error)]
pub enum Error {
  /// `event_end` must be strictly after `event_start` in event ordering.
  #[error(
    "word {name:?}: event range inverted (start {start}, end {end})"
  )]
  EventRangeInverted {
    name:  String,
    start: EventId,
    end:   EventId,
  },

  #[error("word name must not be empty")]
  EmptyWordName,

  #[error("author abbreviation must not be empty")]
  EmptyAuthorAbbreviation,

  #[error("key word must not be empty")]
  EmptyKeyWord,

  /// Case tags are drawn from the fixed approved alphabet.
  #[error("definition for word {word_id}: unapproved case tag {tag:?}")]
  UnapprovedCaseTag { word_id: WordId, tag: char },

  #[error("definition body must not be empty (word {word_id})")]
  EmptyDefinitionBody { word_id: WordId },

  #[error("unknown source language code: {0:?}")]
  UnknownSourceLanguage(char),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
