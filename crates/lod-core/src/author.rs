//! Author — a person or body credited with coining or adopting words.

use serde::{Deserialize, Serialize};

use crate::{AuthorId, Error, Result};

/// An author record. `abbreviation` is the unique handle the flat word
/// records refer to (e.g. `JCB`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  pub author_id:    AuthorId,
  pub abbreviation: String,
  pub full_name:    Option<String>,
  pub notes:        Option<String>,
}

impl Author {
  pub fn new(
    author_id: AuthorId,
    abbreviation: impl Into<String>,
    full_name: Option<String>,
    notes: Option<String>,
  ) -> Result<Self> {
    let abbreviation = abbreviation.into();
    if abbreviation.is_empty() {
      return Err(Error::EmptyAuthorAbbreviation);
    }
    Ok(Self {
      author_id,
      abbreviation,
      full_name,
      notes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_abbreviation_rejected() {
    assert!(Author::new(1, "", None, None).is_err());
  }
}
