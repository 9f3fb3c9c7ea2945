//! Key — a vernacular term indexed against definitions for reverse lookup.

use serde::{Deserialize, Serialize};

use crate::{Error, KeyId, Result};

/// A vernacular key. Identity is the `(word, language)` pair; the graph
/// store deduplicates on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
  pub key_id:   KeyId,
  /// The vernacular term itself.
  pub word:     String,
  pub language: Option<String>,
}

impl Key {
  pub fn new(
    key_id: KeyId,
    word: impl Into<String>,
    language: Option<String>,
  ) -> Result<Self> {
    let word = word.into();
    if word.is_empty() {
      return Err(Error::EmptyKeyWord);
    }
    Ok(Self {
      key_id,
      word,
      language,
    })
  }

  /// The deduplication identity.
  pub fn identity(&self) -> (&str, Option<&str>) {
    (&self.word, self.language.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_key_word_rejected() {
    assert!(Key::new(1, "", None).is_err());
  }
}
