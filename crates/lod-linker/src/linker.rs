//! The linking orchestrator: ingestion followed by the four edge passes.
//!
//! Pass order is a correctness dependency, not a convention: authors,
//! then derivatives, then affixes, then keys. Entities of both endpoint
//! kinds must exist before a pass links them, and a crash mid-pass is
//! recovered by clearing that pass's edge kind and rerunning from a fresh
//! store.

use std::collections::HashMap;

use lod_core::{WordId, key::Key, word_type::TypeGroup};
use lod_graph::GraphStore;
use tracing::{debug, info, warn};

use crate::{
  error::{Error, Result},
  ingest::{self, SourceSet, WordRowBinding, split_packed},
  origin::{self, SWITCH_PRIMS},
  report::{LinkReport, LinkWarning},
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// How the key pass obtains its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyLinking {
  /// Harvest keys from definition bodies, creating missing ones.
  #[default]
  CreateMissing,
  /// Only link against a pre-populated key index; missing keys are
  /// reported, never created.
  LookupOnly,
}

#[derive(Debug, Clone)]
pub struct LinkOptions {
  pub key_linking: KeyLinking,
  /// Language attached to definitions and harvested keys. Configuration,
  /// never inferred from the data.
  pub language:    Option<String>,
}

impl Default for LinkOptions {
  fn default() -> Self {
    Self {
      key_linking: KeyLinking::default(),
      language:    Some("en".to_string()),
    }
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Full rebuild with default options.
pub fn rebuild(
  store: &mut GraphStore,
  sources: &SourceSet,
) -> Result<LinkReport> {
  rebuild_with(store, sources, &LinkOptions::default())
}

/// Full rebuild: ingest every entity, then run the four linking passes in
/// order. A fatal error leaves `store` partially built and unusable; the
/// caller must clear it and rerun.
pub fn rebuild_with(
  store: &mut GraphStore,
  sources: &SourceSet,
  options: &LinkOptions,
) -> Result<LinkReport> {
  let mut report = LinkReport::default();

  let bindings =
    ingest::populate(store, sources, options.language.as_deref())?;

  link_authors(store, &bindings, &mut report)?;
  link_derivatives(store, &bindings, &mut report);
  link_affixes(store, &bindings, &mut report);
  link_keys(store, options, &mut report);

  report.words = store.word_count();
  report.definitions = store.definition_count();
  report.keys = store.key_count();
  info!(
    words = report.words,
    warnings = report.warnings.len(),
    "rebuild complete"
  );
  Ok(report)
}

// ─── Pass 1: authors ─────────────────────────────────────────────────────────

/// Word→author edges from the packed authors subfield. The `/`-separated
/// abbreviation list is data; anything after the first space is a note and
/// was already attached during ingestion. Unknown abbreviations are fatal.
fn link_authors(
  store: &mut GraphStore,
  bindings: &[WordRowBinding],
  report: &mut LinkReport,
) -> Result<()> {
  info!("linking authors");
  for binding in bindings {
    let Some(raw) = binding.record.authors.as_deref() else {
      continue;
    };
    let (token, _) = split_packed(raw);
    for abbreviation in token.split('/').filter(|a| !a.is_empty()) {
      let author_id = store
        .author_by_abbreviation(abbreviation)
        .ok_or_else(|| Error::UnknownAuthor {
          legacy_id:    binding.record.legacy_id,
          abbreviation: abbreviation.to_string(),
        })?
        .author_id;
      for &word_id in &binding.word_ids {
        if store.link_author(word_id, author_id) {
          report.author_edges += 1;
        }
      }
    }
  }
  Ok(())
}

// ─── Pass 2: derivatives ─────────────────────────────────────────────────────

/// Parent→child edges, from two independent sources of truth:
///
/// 1. the "used in" subfield of each word row (` | `-separated child
///    display names);
/// 2. the origin formulas of complexes and compound little words, which
///    name their parents.
///
/// Both feed the same idempotent edge set. Dangling names and unresolvable
/// formula terms are warnings; the dataset is known to contain a few.
fn link_derivatives(
  store: &mut GraphStore,
  bindings: &[WordRowBinding],
  report: &mut LinkReport,
) {
  info!("linking derivatives");
  let switch_affixes = switch_affix_table(bindings);
  let little_vocabulary = little_vocabulary(store);

  for binding in bindings {
    link_used_in(store, binding, report);
    match binding.group {
      Some(TypeGroup::Cpx) => {
        link_complex_parents(store, binding, &switch_affixes, report);
      }
      Some(TypeGroup::Little) => {
        link_little_parents(store, binding, &little_vocabulary, report);
      }
      Some(TypeGroup::Prim) => {
        check_primitive_formula(store, binding, report);
      }
      _ => {}
    }
  }
}

/// C-Prim origins carry the structured `N/NL transcription` shape; validate
/// it so a mangled formula surfaces in the report. Other primitive
/// sub-types keep prose origins and are not checked.
fn check_primitive_formula(
  store: &GraphStore,
  binding: &WordRowBinding,
  report: &mut LinkReport,
) {
  let is_combined = store
    .word_type(binding.type_id)
    .and_then(lod_core::word_type::WordType::subtype_letter)
    == Some('C');
  if !is_combined {
    return;
  }
  let Some(formula) = binding.record.origin.as_deref() else {
    return;
  };
  if let Err(err) = origin::primitive_sources(formula) {
    warn!(word = binding.name, origin = formula, "malformed prim origin");
    report.warn(LinkWarning::FormulaParse {
      word:   binding.name.clone(),
      origin: formula.to_string(),
      detail: err.to_string(),
    });
  }
}

fn link_used_in(
  store: &mut GraphStore,
  binding: &WordRowBinding,
  report: &mut LinkReport,
) {
  let Some(used_in) = binding.record.used_in.as_deref() else {
    return;
  };

  let parent_ids: Vec<WordId> = store
    .words_by_legacy_id(binding.record.legacy_id)
    .iter()
    .map(|w| w.word_id)
    .collect();
  if parent_ids.len() > binding.word_ids.len() {
    // Another word row shares this legacy id. Link from all of them, but
    // record the ambiguity instead of silently picking one.
    warn!(
      name = binding.name,
      legacy_id = binding.record.legacy_id,
      "duplicate parent legacy id"
    );
    report.warn(LinkWarning::DuplicateParentLegacyId {
      name:      binding.name.clone(),
      legacy_id: binding.record.legacy_id,
    });
  }

  for target in used_in.split(" | ").filter(|t| !t.is_empty()) {
    let child_ids: Vec<WordId> =
      store.words_by_name(target).iter().map(|w| w.word_id).collect();
    if child_ids.is_empty() {
      warn!(parent = binding.name, target, "dangling derivative");
      report.warn(LinkWarning::DanglingDerivative {
        parent: binding.name.clone(),
        target: target.to_string(),
      });
      continue;
    }
    for &parent in &parent_ids {
      for &child in &child_ids {
        if store.link_child(parent, child) {
          report.derivative_edges += 1;
        }
      }
    }
  }
}

/// Affix token (hyphen-stripped) → word ids of the switch primitives that
/// list it. Built from the raw rows, so it is available before the affix
/// pass has run.
fn switch_affix_table(
  bindings: &[WordRowBinding],
) -> HashMap<String, Vec<WordId>> {
  let mut table: HashMap<String, Vec<WordId>> = HashMap::new();
  for binding in bindings {
    if !matches!(binding.group, Some(TypeGroup::Prim))
      || SWITCH_PRIMS.binary_search(&binding.name.as_str()).is_err()
    {
      continue;
    }
    let Some(affixes) = binding.record.affixes.as_deref() else {
      continue;
    };
    for token in affixes.split_whitespace() {
      let token = token.trim_end_matches('-');
      table
        .entry(token.to_string())
        .or_default()
        .extend(binding.word_ids.iter().copied());
    }
  }
  table
}

fn link_complex_parents(
  store: &mut GraphStore,
  binding: &WordRowBinding,
  switch_affixes: &HashMap<String, Vec<WordId>>,
  report: &mut LinkReport,
) {
  let Some(formula) = binding.record.origin.as_deref() else {
    return;
  };

  for term in origin::complex_sources(formula) {
    let mut parent_ids: Vec<WordId> =
      store.words_by_name(&term).iter().map(|w| w.word_id).collect();
    if parent_ids.is_empty() {
      // Switch primitives are named by their affix surface in formulas;
      // resolve through the affix table for exactly those.
      if let Some(ids) = switch_affixes.get(term.as_str()) {
        parent_ids = ids.clone();
      }
    }
    if parent_ids.is_empty() {
      debug!(word = binding.name, term, "unresolved formula term");
      report.warn(LinkWarning::UnresolvedFormulaTerm {
        word: binding.name.clone(),
        term,
      });
      continue;
    }
    for &parent in &parent_ids {
      for &child in &binding.word_ids {
        if store.link_child(parent, child) {
          report.derivative_edges += 1;
        }
      }
    }
  }
}

/// Names of the little primitives a compound can be split against. The
/// vocabulary is closed: one- and two-letter words of the Little group.
fn little_vocabulary(store: &GraphStore) -> Vec<String> {
  store
    .words_in_group(&TypeGroup::Little)
    .iter()
    .filter(|w| w.name.chars().count() <= 2)
    .map(|w| w.name.clone())
    .collect()
}

fn link_little_parents(
  store: &mut GraphStore,
  binding: &WordRowBinding,
  vocabulary: &[String],
  report: &mut LinkReport,
) {
  let Some(formula) = binding.record.origin.as_deref() else {
    return;
  };

  let lookup = |m: &str| vocabulary.iter().any(|v| v == m);
  let morphemes = match origin::little_sources(formula, lookup) {
    Ok(morphemes) => morphemes,
    Err(err) => {
      warn!(word = binding.name, origin = formula, "unsplittable compound");
      report.warn(LinkWarning::FormulaParse {
        word:   binding.name.clone(),
        origin: formula.to_string(),
        detail: err.to_string(),
      });
      return;
    }
  };

  for morpheme in morphemes {
    let parent_ids: Vec<WordId> = store
      .words_by_name(&morpheme)
      .iter()
      .map(|w| w.word_id)
      .collect();
    for &parent in &parent_ids {
      for &child in &binding.word_ids {
        if store.link_child(parent, child) {
          report.derivative_edges += 1;
        }
      }
    }
  }
}

// ─── Pass 3: affixes ─────────────────────────────────────────────────────────

/// Primitive→affix edges from the affixes subfield. Affix words are stored
/// both with and without a trailing hyphen, so each token is tried in both
/// spellings against `Afx`-type words. Every primitive row sharing the
/// legacy id receives the same edges.
fn link_affixes(
  store: &mut GraphStore,
  bindings: &[WordRowBinding],
  report: &mut LinkReport,
) {
  info!("linking affixes");
  for binding in bindings {
    if !matches!(binding.group, Some(TypeGroup::Prim)) {
      continue;
    }
    let Some(affixes) = binding.record.affixes.as_deref() else {
      continue;
    };

    let sibling_ids: Vec<WordId> = store
      .words_by_legacy_id(binding.record.legacy_id)
      .iter()
      .map(|w| w.word_id)
      .collect();

    for token in affixes.split_whitespace() {
      let hyphenated = format!("{token}-");
      let affix_ids: Vec<WordId> = store
        .words_by_name(token)
        .into_iter()
        .chain(store.words_by_name(&hyphenated))
        .filter(|w| {
          store.type_of(w).is_some_and(|t| t.type_code == "Afx")
        })
        .map(|w| w.word_id)
        .collect();
      if affix_ids.is_empty() {
        warn!(primitive = binding.name, token, "dangling affix");
        report.warn(LinkWarning::DanglingAffix {
          primitive: binding.name.clone(),
          token:     token.to_string(),
        });
        continue;
      }
      for &primitive in &sibling_ids {
        for &affix in &affix_ids {
          if store.link_child(primitive, affix) {
            report.affix_edges += 1;
          }
        }
      }
    }
  }
}

// ─── Pass 4: keys ────────────────────────────────────────────────────────────

/// Definition→key edges from the `«…»` markers embedded in definition
/// bodies. With [`KeyLinking::CreateMissing`] a harvested term becomes a
/// key on first sight; with [`KeyLinking::LookupOnly`] missing keys are
/// reported.
fn link_keys(
  store: &mut GraphStore,
  options: &LinkOptions,
  report: &mut LinkReport,
) {
  info!("linking keys");
  let harvest: Vec<(i64, String, Vec<String>)> = store
    .definitions()
    .map(|d| {
      let word = store
        .word(d.word_id)
        .map(|w| w.name.clone())
        .unwrap_or_default();
      let terms =
        d.embedded_keys().iter().map(|t| t.to_string()).collect();
      (d.definition_id, word, terms)
    })
    .collect();

  for (definition_id, word, terms) in harvest {
    for term in terms {
      let key_id = match options.key_linking {
        KeyLinking::CreateMissing => {
          match Key::new(store.next_key_id(), &term, options.language.clone())
          {
            Ok(key) => Some(store.insert_key(key)),
            Err(_) => None,
          }
        }
        KeyLinking::LookupOnly => store
          .key_by_identity(&term, options.language.as_deref())
          .map(|k| k.key_id),
      };
      let Some(key_id) = key_id else {
        warn!(word, key = term, "unknown key");
        report.warn(LinkWarning::UnknownKey {
          word: word.clone(),
          key:  term,
        });
        continue;
      };
      if store.link_key(definition_id, key_id) {
        report.key_edges += 1;
      }
    }
  }
}
