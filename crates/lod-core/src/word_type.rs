//! Word type — the classification that selects a word's derivation
//! algorithm.
//!
//! `type_code` is the fine-grained class ("C-Prim", "2-Cpx", "Afx", "LW" …);
//! `group` is the coarse class that decides how an origin formula is read.

use serde::{Deserialize, Serialize};

use crate::TypeId;

/// Coarse type group. The group determines which origin-decomposition
/// algorithm applies to words of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeGroup {
  /// Root words; C-Prims decompose into per-language [`crate::source::WordSource`]s.
  Prim,
  /// Complex predicates built from `+`-joined affix formulas.
  Cpx,
  /// Closed-class grammatical words; compounds split positionally.
  Little,
  /// Any other group label found in the source data.
  Other(String),
}

impl TypeGroup {
  pub fn parse(s: &str) -> TypeGroup {
    match s {
      "Prim" => TypeGroup::Prim,
      "Cpx" => TypeGroup::Cpx,
      "Little" => TypeGroup::Little,
      other => TypeGroup::Other(other.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      TypeGroup::Prim => "Prim",
      TypeGroup::Cpx => "Cpx",
      TypeGroup::Little => "Little",
      TypeGroup::Other(s) => s,
    }
  }
}

/// A word-type record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordType {
  pub type_id:     TypeId,
  /// Primary class code, e.g. `C-Prim`, `2-Cpx`, `Afx`, `LW`.
  pub type_code:   String,
  /// Extended class label, e.g. `Predicate`, `Affix`.
  pub type_x:      String,
  pub group:       Option<TypeGroup>,
  /// Whether words of this type may parent derivatives.
  pub parentable:  bool,
  pub description: Option<String>,
}

impl WordType {
  /// First letter of the type code — the primitive sub-type discriminant
  /// (`C` = combined/compromise primitive, `D`, `I`, `L`, `N`, `O`, `S`).
  pub fn subtype_letter(&self) -> Option<char> {
    self.type_code.chars().next()
  }

  pub fn is_group(&self, group: &TypeGroup) -> bool {
    self.group.as_ref() == Some(group)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn group_parse_round_trip() {
    for raw in ["Prim", "Cpx", "Little", "Predicate"] {
      assert_eq!(TypeGroup::parse(raw).as_str(), raw);
    }
  }

  #[test]
  fn subtype_letter_is_first_of_code() {
    let t = WordType {
      type_id:     1,
      type_code:   "C-Prim".to_string(),
      type_x:      "Predicate".to_string(),
      group:       Some(TypeGroup::Prim),
      parentable:  true,
      description: None,
    };
    assert_eq!(t.subtype_letter(), Some('C'));
  }
}
