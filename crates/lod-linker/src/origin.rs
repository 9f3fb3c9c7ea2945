//! Origin-formula resolution.
//!
//! A word's `origin` string records its etymology in a grammar selected by
//! the word's type group:
//!
//! - complexes join affix terms with `+`, optionally parenthesized, with
//!   filler syllables and liaison letters mixed in;
//! - combined primitives (C-Prims) list per-language contributors as
//!   `score/lengthLANG transcription`, ` | `-separated;
//! - compound little words concatenate one- and two-letter morphemes with
//!   no delimiter at all.
//!
//! Everything here is pure string work against literal origin text. Graph
//! lookups (resolving a term to an actual word) happen in the linker.

use lod_core::source::{SourceLanguage, WordSource};

/// Primitives whose affix surface differs from the prim name itself. A
/// complex-formula term naming one of these will not resolve by word name;
/// the linker falls back to the affix→parent edge for exactly this set.
pub const SWITCH_PRIMS: &[&str] = &[
  "canli", "farfu", "folma", "forli", "kutla", "marka", "mordu", "sanca",
  "sordi", "suksi", "surna",
];

/// Formula text that does not match the grammar its word class calls for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
  /// A C-Prim source group is not of the `N/NL transcription` shape.
  #[error("malformed source group {group:?} in origin {origin:?}")]
  MalformedSourceGroup { origin: String, group: String },
  /// The LANG letter of a source group is not in the fixed language table.
  #[error("unknown source language {0:?}")]
  UnknownLanguage(char),
  /// A little-word compound has a remainder no vocabulary morpheme covers.
  #[error("cannot split little compound {origin:?} at {remainder:?}")]
  UnsplittableLittle { origin: String, remainder: String },
}

pub type Result<T, E = FormulaError> = std::result::Result<T, E>;

/// Syllables inserted into complex formulas for phonotactics only. They are
/// not source words and are dropped during decomposition.
const FILLERS: &[&str] = &["y", "r", "n"];

/// Decompose a complex-word origin formula into its candidate source-word
/// names, in formula order.
///
/// Grouping parentheses and slashes are stripped, terms split on `+`,
/// fillers dropped, and one trailing liaison `r`/`h` removed from each
/// surviving term.
pub fn complex_sources(origin: &str) -> Vec<String> {
  let cleaned: String = origin
    .chars()
    .filter(|c| !matches!(c, '(' | ')' | '/' | ' '))
    .collect();
  cleaned
    .split('+')
    .filter(|term| !term.is_empty() && !FILLERS.contains(term))
    .map(strip_liaison)
    .collect()
}

/// Trailing `r` and `h` encode phonological liaison with the next term, not
/// part of the source word's name.
fn strip_liaison(term: &str) -> String {
  match term.strip_suffix(['r', 'h']) {
    Some(stem) if !stem.is_empty() => stem.to_string(),
    _ => term.to_string(),
  }
}

/// Decompose a C-Prim origin formula (`3/5R mesto | 2/4E test`) into one
/// [`WordSource`] per contributing language.
///
/// Only C-Prims carry this structured shape; other primitive sub-types keep
/// their origin text as free prose and never reach this function.
pub fn primitive_sources(origin: &str) -> Result<Vec<WordSource>> {
  origin
    .split(" | ")
    .map(|group| parse_source_group(origin, group.trim()))
    .collect()
}

fn parse_source_group(origin: &str, group: &str) -> Result<WordSource> {
  let malformed = || FormulaError::MalformedSourceGroup {
    origin: origin.to_string(),
    group:  group.to_string(),
  };

  let (score, rest) = group.split_once('/').ok_or_else(malformed)?;
  let (lengthlang, transcription) = rest.split_once(' ').ok_or_else(malformed)?;

  let lang_code = lengthlang.chars().next_back().ok_or_else(malformed)?;
  let length = &lengthlang[..lengthlang.len() - lang_code.len_utf8()];

  let coincidence: u8 = score.trim().parse().map_err(|_| malformed())?;
  let length: u8 = length.parse().map_err(|_| malformed())?;
  let language = SourceLanguage::from_code(lang_code)
    .map_err(|_| FormulaError::UnknownLanguage(lang_code))?;

  if transcription.is_empty() {
    return Err(malformed());
  }
  Ok(WordSource {
    coincidence,
    length,
    language,
    transcription: transcription.to_string(),
  })
}

/// Split a compound little word into its morphemes by greedy positional
/// matching: at each position try the two-letter prefix against
/// `vocabulary`, then the one-letter prefix.
///
/// `vocabulary` is the closed set of little-primitive names the caller
/// harvested from the graph.
pub fn little_sources<V>(origin: &str, vocabulary: V) -> Result<Vec<String>>
where V: Fn(&str) -> bool {
  let mut sources = Vec::new();
  let mut rest = origin;
  while !rest.is_empty() {
    let two = rest.get(..2).filter(|p| vocabulary(p));
    let one = rest.get(..1).filter(|p| vocabulary(p));
    match two.or(one) {
      Some(morpheme) => {
        sources.push(morpheme.to_string());
        rest = &rest[morpheme.len()..];
      }
      None => {
        return Err(FormulaError::UnsplittableLittle {
          origin:    origin.to_string(),
          remainder: rest.to_string(),
        });
      }
    }
  }
  Ok(sources)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use lod_core::source::SourceLanguage;

  use super::*;

  #[test]
  fn complex_formula_basic() {
    assert_eq!(
      complex_sources("forli+(djano)+cenja"),
      vec!["forli", "djano", "cenja"]
    );
  }

  #[test]
  fn complex_formula_drops_fillers_and_liaison() {
    // "y" is a filler syllable; the trailing "r" on "durzo" is liaison.
    assert_eq!(complex_sources("durzor+y+takna"), vec!["durzo", "takna"]);
    assert_eq!(complex_sources("bukcuh+cutri"), vec!["bukcu", "cutri"]);
  }

  #[test]
  fn complex_formula_strips_slashes_and_blanks() {
    assert_eq!(complex_sources("nor/ + mia"), vec!["no", "mia"]);
  }

  #[test]
  fn complex_formula_of_empty_origin_is_empty() {
    assert!(complex_sources("").is_empty());
  }

  #[test]
  fn single_letter_filler_term_survives_liaison_strip() {
    // A bare "r" term is a filler; a bare "h" term is not and stays intact.
    assert_eq!(complex_sources("r+h"), vec!["h"]);
  }

  #[test]
  fn primitive_formula_two_languages() {
    let sources = primitive_sources("3/5R mesto | 2/4E test").unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].coincidence, 3);
    assert_eq!(sources[0].length, 5);
    assert_eq!(sources[0].language, SourceLanguage::Russian);
    assert_eq!(sources[0].transcription, "mesto");
    assert_eq!(sources[1].language, SourceLanguage::English);
    assert_eq!(sources[1].transcription, "test");
  }

  #[test]
  fn primitive_formula_multiword_transcription() {
    let sources = primitive_sources("2/6C syin shia").unwrap();
    assert_eq!(sources[0].transcription, "syin shia");
  }

  #[test]
  fn primitive_formula_rejects_prose() {
    assert!(matches!(
      primitive_sources("borrowed from ISV"),
      Err(FormulaError::MalformedSourceGroup { .. })
    ));
  }

  #[test]
  fn primitive_formula_rejects_unknown_language() {
    assert!(matches!(
      primitive_sources("3/5X mesto"),
      Err(FormulaError::UnknownLanguage('X'))
    ));
  }

  #[test]
  fn little_split_prefers_two_letter_morphemes() {
    let vocab = ["no", "u", "nu"];
    let lookup = |m: &str| vocab.contains(&m);
    assert_eq!(little_sources("nou", lookup).unwrap(), vec!["no", "u"]);
    assert_eq!(little_sources("unu", lookup).unwrap(), vec!["u", "nu"]);
  }

  #[test]
  fn little_split_reports_uncovered_remainder() {
    let lookup = |m: &str| m == "no";
    assert!(matches!(
      little_sources("noxi", lookup),
      Err(FormulaError::UnsplittableLittle { remainder, .. }) if remainder == "xi"
    ));
  }

  #[test]
  fn switch_prims_are_sorted_for_binary_search() {
    let mut sorted = SWITCH_PRIMS.to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, SWITCH_PRIMS);
  }
}
