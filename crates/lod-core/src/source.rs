//! Word source — one etymological contributor to a combined primitive.
//!
//! Derived from a C-Prim's origin formula (`3/5R mesto | 2/4E test`), never
//! persisted as a first-class entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Single-letter source-language codes used in C-Prim origin formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLanguage {
  English,
  Chinese,
  Hindi,
  Russian,
  Spanish,
  French,
  Japanese,
  German,
}

impl SourceLanguage {
  pub fn from_code(code: char) -> Result<Self> {
    Ok(match code {
      'E' => Self::English,
      'C' => Self::Chinese,
      'H' => Self::Hindi,
      'R' => Self::Russian,
      'S' => Self::Spanish,
      'F' => Self::French,
      'J' => Self::Japanese,
      'G' => Self::German,
      other => return Err(Error::UnknownSourceLanguage(other)),
    })
  }

  pub fn code(self) -> char {
    match self {
      Self::English => 'E',
      Self::Chinese => 'C',
      Self::Hindi => 'H',
      Self::Russian => 'R',
      Self::Spanish => 'S',
      Self::French => 'F',
      Self::Japanese => 'J',
      Self::German => 'G',
    }
  }

  pub fn full_name(self) -> &'static str {
    match self {
      Self::English => "English",
      Self::Chinese => "Chinese",
      Self::Hindi => "Hindi",
      Self::Russian => "Russian",
      Self::Spanish => "Spanish",
      Self::French => "French",
      Self::Japanese => "Japanese",
      Self::German => "German",
    }
  }
}

/// One contributing natural-language word behind a combined primitive.
///
/// `coincidence` counts the letters the primitive shares with the
/// transcription; `length` is the transcription's length as scored in the
/// source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSource {
  pub coincidence:   u8,
  pub length:        u8,
  pub language:      SourceLanguage,
  pub transcription: String,
}

impl fmt::Display for WordSource {
  /// The source-data notation, e.g. `3/5R mesto`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}/{}{} {}",
      self.coincidence,
      self.length,
      self.language.code(),
      self.transcription
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn language_codes_round_trip() {
    for code in ['E', 'C', 'H', 'R', 'S', 'F', 'J', 'G'] {
      assert_eq!(SourceLanguage::from_code(code).unwrap().code(), code);
    }
    assert!(SourceLanguage::from_code('X').is_err());
  }

  #[test]
  fn display_matches_source_notation() {
    let ws = WordSource {
      coincidence:   3,
      length:        5,
      language:      SourceLanguage::Russian,
      transcription: "mesto".to_string(),
    };
    assert_eq!(ws.to_string(), "3/5R mesto");
  }
}
