//! Export: a linked graph back into flat records.
//!
//! The inverse of ingestion, up to the packing the flat format cannot
//! represent losslessly: author order inside the packed subfield and the
//! row grouping of same-legacy-id siblings are normalised (abbreviations
//! sorted, one word row per legacy id).

use std::collections::{BTreeMap, HashSet};

use lod_core::word::Word;
use lod_graph::GraphStore;
use lod_text::record::{
  AuthorRecord, DefinitionRecord, EVENT_END_OPEN, EventRecord, SettingRecord,
  SpellRecord, SyllableRecord, TypeRecord, WordRecord,
};

use crate::ingest::SourceSet;

/// Rebuild the flat record set from a linked graph.
pub fn export(store: &GraphStore) -> SourceSet {
  SourceSet {
    authors:     export_authors(store),
    events:      export_events(store),
    settings:    export_settings(store),
    syllables:   export_syllables(store),
    types:       export_types(store),
    words:       export_words(store),
    spells:      export_spells(store),
    definitions: export_definitions(store),
  }
}

fn export_authors(store: &GraphStore) -> Vec<AuthorRecord> {
  store
    .authors()
    .map(|a| AuthorRecord {
      abbreviation: a.abbreviation.clone(),
      full_name:    a.full_name.clone(),
      notes:        a.notes.clone(),
    })
    .collect()
}

fn export_events(store: &GraphStore) -> Vec<EventRecord> {
  store
    .events()
    .map(|e| EventRecord {
      event_id:   e.event_id,
      name:       e.name.clone(),
      date:       e.date,
      definition: e.definition.clone(),
      annotation: e.annotation.clone(),
      suffix:     e.suffix.clone(),
    })
    .collect()
}

fn export_settings(store: &GraphStore) -> Vec<SettingRecord> {
  store
    .settings()
    .iter()
    .map(|s| SettingRecord {
      date:         s.date,
      db_version:   s.db_version,
      last_word_id: s.last_word_id,
      db_release:   s.db_release.clone(),
    })
    .collect()
}

fn export_syllables(store: &GraphStore) -> Vec<SyllableRecord> {
  store
    .syllables()
    .iter()
    .map(|s| SyllableRecord {
      name:    s.name.clone(),
      kind:    s.kind.clone(),
      allowed: s.allowed,
    })
    .collect()
}

fn export_types(store: &GraphStore) -> Vec<TypeRecord> {
  store
    .types()
    .map(|t| TypeRecord {
      type_code:   t.type_code.clone(),
      type_x:      t.type_x.clone(),
      group:       t.group.as_ref().map(|g| g.as_str().to_string()),
      parentable:  t.parentable,
      description: t.description.clone(),
    })
    .collect()
}

/// Words grouped by legacy id, scalar fields from the first word of each
/// group.
fn by_legacy_id(store: &GraphStore) -> BTreeMap<i64, Vec<&Word>> {
  let mut groups: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
  for word in store.words() {
    groups.entry(word.legacy_id).or_default().push(word);
  }
  groups
}

/// Re-pack a data token with its free-text note.
fn pack(token: Option<String>, note: Option<&String>) -> Option<String> {
  match (token, note) {
    (Some(token), Some(note)) => Some(format!("{token} {note}")),
    (Some(token), None) => Some(token),
    (None, Some(note)) => Some(note.clone()),
    (None, None) => None,
  }
}

fn export_words(store: &GraphStore) -> Vec<WordRecord> {
  let mut records = Vec::new();
  for (legacy_id, words) in by_legacy_id(store) {
    let word = words[0];
    let word_type = store.type_of(word);
    let notes = word.notes.clone().unwrap_or_default();

    let abbreviations: Vec<String> = store
      .authors_of(word.word_id)
      .iter()
      .map(|a| a.abbreviation.clone())
      .collect();
    let authors = pack(
      (!abbreviations.is_empty()).then(|| abbreviations.join("/")),
      notes.author.as_ref(),
    );

    let affixes: Vec<String> = store
      .affixes_of(word.word_id)
      .iter()
      .map(|a| a.name.trim_end_matches('-').to_string())
      .collect();
    let used_in: Vec<String> = store
      .complexes_of(word.word_id)
      .iter()
      .map(|c| c.name.clone())
      .collect();

    records.push(WordRecord {
      legacy_id,
      type_code: word_type.map(|t| t.type_code.clone()).unwrap_or_default(),
      type_x: word_type.map(|t| t.type_x.clone()).unwrap_or_default(),
      affixes: (!affixes.is_empty()).then(|| affixes.join(" ")),
      match_code: word.match_code.clone(),
      authors,
      year: pack(word.year.map(|y| y.to_string()), notes.year.as_ref()),
      rank: pack(word.rank.clone(), notes.rank.as_ref()),
      origin: word.origin.clone(),
      origin_x: word.origin_x.clone(),
      used_in: (!used_in.is_empty()).then(|| used_in.join(" | ")),
      tid_legacy: word.tid_legacy,
    });
  }
  records
}

/// `0` for an uppercase letter, `5` otherwise — the capitalisation mask of
/// the spell table.
fn case_code(name: &str) -> String {
  name
    .chars()
    .map(|c| if c.is_uppercase() { '0' } else { '5' })
    .collect()
}

fn export_spells(store: &GraphStore) -> Vec<SpellRecord> {
  let mut seen = HashSet::new();
  let mut records = Vec::new();
  for (legacy_id, words) in by_legacy_id(store) {
    for word in words {
      let record = SpellRecord {
        legacy_id,
        name: word.name.clone(),
        name_lower: word.name.to_lowercase(),
        case_code: case_code(&word.name),
        event_start: word.event_start_id,
        event_end: word.event_end_id.unwrap_or(EVENT_END_OPEN),
      };
      // Same-legacy-id siblings share their spell rows; emit each once.
      if seen.insert(record.clone()) {
        records.push(record);
      }
    }
  }
  records
}

fn export_definitions(store: &GraphStore) -> Vec<DefinitionRecord> {
  let mut seen = HashSet::new();
  let mut records: Vec<DefinitionRecord> = Vec::new();
  for (legacy_id, words) in by_legacy_id(store) {
    for word in words {
      for definition in store.definitions_of(word.word_id) {
        let grammar = match (definition.slots, &definition.grammar_code) {
          (Some(slots), Some(code)) => Some(format!("{slots}{code}")),
          (Some(slots), None) => Some(slots.to_string()),
          (None, Some(code)) => Some(code.clone()),
          (None, None) => None,
        };
        let record = DefinitionRecord {
          legacy_word_id: legacy_id,
          position: definition.position,
          usage: definition.usage.clone(),
          grammar,
          body: definition.body.clone(),
          case_tags: definition.case_tags.clone(),
        };
        // Ingestion fans one source row out to every word of the legacy
        // id; fold those back into one.
        if seen.insert(record.clone()) {
          records.push(record);
        }
      }
    }
  }
  records
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use lod_core::{
    definition::Definition,
    word::Word,
    word_type::{TypeGroup, WordType},
  };

  use super::*;

  #[test]
  fn sibling_fanout_collapses_to_unique_records() {
    let mut store = GraphStore::new();
    store.insert_type(WordType {
      type_id:     1,
      type_code:   "C-Prim".to_string(),
      type_x:      "Predicate".to_string(),
      group:       Some(TypeGroup::Prim),
      parentable:  true,
      description: None,
    });
    // Two sibling rows under one legacy id, sharing the spell and the
    // fanned-out definition.
    store.insert_word(Word::new(1, 10, "forli", 1, 1).unwrap());
    store.insert_word(Word::new(2, 10, "forli", 1, 1).unwrap());
    store.insert_definition(
      Definition::new(1, 1, 1, None, None, None, None, "is strong", None)
        .unwrap(),
    );
    store.insert_definition(
      Definition::new(2, 2, 1, None, None, None, None, "is strong", None)
        .unwrap(),
    );

    let records = export(&store);
    assert_eq!(records.spells.len(), 1);
    assert_eq!(records.definitions.len(), 1);
  }

  #[test]
  fn case_code_masks_capitals() {
    assert_eq!(case_code("forli"), "55555");
    assert_eq!(case_code("Loglandia"), "055555555");
  }

  #[test]
  fn pack_joins_token_and_note() {
    assert_eq!(
      pack(Some("1975".to_string()), Some(&"revised".to_string())),
      Some("1975 revised".to_string())
    );
    assert_eq!(pack(Some("1975".to_string()), None), Some("1975".to_string()));
    assert_eq!(pack(None, None), None);
  }
}
