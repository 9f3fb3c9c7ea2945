//! [`LinkReport`] — the structured outcome of one rebuild run.

use serde::{Deserialize, Serialize};

/// A non-fatal data-quality finding. Warnings never abort the run; they
/// accumulate here for operator review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkWarning {
  /// A "used in" entry names a word that does not exist.
  DanglingDerivative { parent: String, target: String },

  /// An affix token of a primitive resolves to no `Afx` word.
  DanglingAffix { primitive: String, token: String },

  /// A complex-formula term resolves to no word, even through the
  /// switch-primitive affix fallback.
  UnresolvedFormulaTerm { word: String, term: String },

  /// An origin string does not match the grammar of its word's type group.
  /// The word keeps an empty contributor list.
  FormulaParse {
    word:   String,
    origin: String,
    detail: String,
  },

  /// More than one word row shares the legacy id of a derivation parent.
  /// All of them receive the parent edges; the ambiguity is recorded.
  DuplicateParentLegacyId { name: String, legacy_id: i64 },

  /// A definition body embeds a key that the pre-populated key index does
  /// not contain (lookup-only flow).
  UnknownKey { word: String, key: String },
}

/// Counters and warnings from a full rebuild. Serializable so the CLI can
/// emit it as JSON for operator tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkReport {
  pub words:            usize,
  pub definitions:      usize,
  pub keys:             usize,
  pub author_edges:     usize,
  pub derivative_edges: usize,
  pub affix_edges:      usize,
  pub key_edges:        usize,
  pub warnings:         Vec<LinkWarning>,
}

impl LinkReport {
  pub fn warn(&mut self, warning: LinkWarning) {
    self.warnings.push(warning);
  }

  pub fn is_clean(&self) -> bool {
    self.warnings.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn warnings_serialize_with_a_kind_tag() {
    let mut report = LinkReport::default();
    report.warn(LinkWarning::DanglingDerivative {
      parent: "forli".to_string(),
      target: "fortia".to_string(),
    });
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains(r#""kind":"dangling_derivative""#));
    assert!(!report.is_clean());
  }
}
