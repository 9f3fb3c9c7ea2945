//! Definition — one sense of a word in one vernacular language.

use serde::{Deserialize, Serialize};

use crate::{DefinitionId, Error, Result, WordId};

/// The fixed alphabet of approved case tags.
pub const APPROVED_CASE_TAGS: &[char] =
  &['B', 'C', 'D', 'F', 'G', 'J', 'K', 'N', 'P', 'S', 'V'];

/// A definition of a word. `position` orders the definitions of one word and
/// is unique within it. `body` may embed vernacular keys between `«…»`
/// markers; those are extracted and linked by the linker's key pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
  pub definition_id: DefinitionId,
  pub word_id:       WordId,
  pub position:      i64,
  /// Usage template, e.g. `da ludpia ku`.
  pub usage:         Option<String>,
  pub grammar_code:  Option<String>,
  /// Argument-slot count for predicate definitions.
  pub slots:         Option<u8>,
  /// Case tags; every character must come from [`APPROVED_CASE_TAGS`].
  pub case_tags:     Option<String>,
  pub body:          String,
  pub language:      Option<String>,
  pub notes:         Option<String>,
}

impl Definition {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    definition_id: DefinitionId,
    word_id: WordId,
    position: i64,
    usage: Option<String>,
    grammar_code: Option<String>,
    slots: Option<u8>,
    case_tags: Option<String>,
    body: impl Into<String>,
    language: Option<String>,
  ) -> Result<Self> {
    let body = body.into();
    if body.is_empty() {
      return Err(Error::EmptyDefinitionBody { word_id });
    }
    if let Some(tags) = &case_tags
      && let Some(bad) = tags
        .chars()
        .find(|c| !c.is_whitespace() && !APPROVED_CASE_TAGS.contains(c))
    {
      return Err(Error::UnapprovedCaseTag { word_id, tag: bad });
    }
    Ok(Self {
      definition_id,
      word_id,
      position,
      usage,
      grammar_code,
      slots,
      case_tags,
      body,
      language,
      notes: None,
    })
  }

  /// Vernacular terms embedded in the body between `«` and `»` markers, in
  /// order of appearance.
  pub fn embedded_keys(&self) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut rest = self.body.as_str();
    while let Some(open) = rest.find('«') {
      let after = &rest[open + '«'.len_utf8()..];
      match after.find('»') {
        Some(close) => {
          let term = &after[..close];
          if !term.is_empty() {
            keys.push(term);
          }
          rest = &after[close + '»'.len_utf8()..];
        }
        None => break, // unbalanced marker: ignore the tail
      }
    }
    keys
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn definition(body: &str, case_tags: Option<&str>) -> Result<Definition> {
    Definition::new(
      1,
      1,
      1,
      None,
      Some("v".to_string()),
      Some(2),
      case_tags.map(str::to_string),
      body,
      Some("en".to_string()),
    )
  }

  #[test]
  fn embedded_keys_extracted_in_order() {
    let d = definition("to «test» or «examine»", None).unwrap();
    assert_eq!(d.embedded_keys(), vec!["test", "examine"]);
  }

  #[test]
  fn unbalanced_marker_ignores_tail() {
    let d = definition("to «test» and «broken", None).unwrap();
    assert_eq!(d.embedded_keys(), vec!["test"]);
  }

  #[test]
  fn body_without_keys_yields_none() {
    let d = definition("a plain body", None).unwrap();
    assert!(d.embedded_keys().is_empty());
  }

  #[test]
  fn approved_case_tags_accepted() {
    assert!(definition("x", Some("K P")).is_ok());
  }

  #[test]
  fn unapproved_case_tag_rejected() {
    assert!(matches!(
      definition("x", Some("KQ")),
      Err(Error::UnapprovedCaseTag { tag: 'Q', .. })
    ));
  }

  #[test]
  fn empty_body_rejected() {
    assert!(matches!(
      definition("", None),
      Err(Error::EmptyDefinitionBody { .. })
    ));
  }
}
