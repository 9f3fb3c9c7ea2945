//! Ingestion: flat records in file-plan order → canonical graph entities.
//!
//! Word ingestion performs the spell merge: `Words.txt` rows carry lexical
//! data keyed by legacy id, `WordSpell.txt` rows carry the event-scoped
//! display forms. One canonical word is created per (word row, spell row)
//! pair. The raw word rows survive ingestion as [`WordRowBinding`]s because
//! the linking passes need their packed authors/affixes/used-in subfields,
//! which are not part of any canonical entity.

use std::collections::HashMap;

use lod_core::{
  TypeId, WordId,
  author::Author,
  definition::Definition,
  event::Event,
  support::{Setting, Syllable},
  word::{Word, WordNotes},
  word_type::{TypeGroup, WordType},
};
use lod_graph::GraphStore;
use lod_text::{
  Record, SourceFetcher, file_spec, parse_all,
  record::{
    AuthorRecord, DefinitionRecord, EventRecord, SettingRecord, SpellRecord,
    SyllableRecord, TypeRecord, WordRecord,
  },
};
use tracing::{debug, info};

use crate::error::{Error, Result};

// ─── Source set ──────────────────────────────────────────────────────────────

/// The full set of parsed source records, one collection per file-plan row.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
  pub authors:     Vec<AuthorRecord>,
  pub events:      Vec<EventRecord>,
  pub settings:    Vec<SettingRecord>,
  pub syllables:   Vec<SyllableRecord>,
  pub types:       Vec<TypeRecord>,
  pub words:       Vec<WordRecord>,
  pub spells:      Vec<SpellRecord>,
  pub definitions: Vec<DefinitionRecord>,
}

impl SourceSet {
  /// Fetch and parse every file of the plan from `base` (a directory path
  /// or URL prefix). One malformed line aborts its whole kind.
  pub fn load(
    fetcher: &dyn SourceFetcher,
    base: &str,
    separator: char,
  ) -> Result<Self> {
    Ok(Self {
      authors:     load_kind(fetcher, base, separator)?,
      events:      load_kind(fetcher, base, separator)?,
      settings:    load_kind(fetcher, base, separator)?,
      syllables:   load_kind(fetcher, base, separator)?,
      types:       load_kind(fetcher, base, separator)?,
      words:       load_kind(fetcher, base, separator)?,
      spells:      load_kind(fetcher, base, separator)?,
      definitions: load_kind(fetcher, base, separator)?,
    })
  }
}

fn load_kind<R: Record>(
  fetcher: &dyn SourceFetcher,
  base: &str,
  separator: char,
) -> Result<Vec<R>> {
  let spec = file_spec(R::KIND);
  let source = format!("{}/{}", base.trim_end_matches('/'), spec.file_name);
  let lines = fetcher.fetch(&source).map_err(|source| Error::Ingest {
    kind: R::KIND,
    source,
  })?;
  let records =
    parse_all(lines.iter().map(String::as_str), separator).map_err(
      |source| Error::Ingest {
        kind: R::KIND,
        source,
      },
    )?;
  debug!(kind = %R::KIND, records = records.len(), "loaded source file");
  Ok(records)
}

// ─── Word row binding ────────────────────────────────────────────────────────

/// One raw word row together with the canonical words created from it.
/// The linking passes iterate these instead of the graph, since the packed
/// relationship subfields exist only on the row.
#[derive(Debug, Clone)]
pub struct WordRowBinding {
  pub record:   WordRecord,
  pub word_ids: Vec<WordId>,
  pub type_id:  TypeId,
  pub group:    Option<TypeGroup>,
  /// First spell's display form, used when warning about this row.
  pub name:     String,
}

// ─── Packed subfields ────────────────────────────────────────────────────────

/// Split a packed subfield into its leading data token and the trailing
/// free-text note (`"JCB/AAR extra note"` → `("JCB/AAR", Some("extra note"))`).
pub fn split_packed(raw: &str) -> (&str, Option<String>) {
  match raw.split_once(' ') {
    Some((token, note)) if !note.trim().is_empty() => {
      (token, Some(note.trim().to_string()))
    }
    Some((token, _)) => (token, None),
    None => (raw, None),
  }
}

/// Split the packed year subfield. A leading token that parses as a year
/// becomes the year; otherwise the whole field is annotation.
fn split_year(raw: &str) -> (Option<i32>, Option<String>) {
  let (token, note) = split_packed(raw);
  match token.parse::<i32>() {
    Ok(year) => (Some(year), note),
    Err(_) => (None, Some(raw.trim().to_string())),
  }
}

// ─── Population ─────────────────────────────────────────────────────────────

/// Insert every entity of `sources` into `store`, in file-plan order.
/// Returns the word-row bindings the linking passes consume.
///
/// `language` is attached to definitions (and through them to harvested
/// keys); the source tables do not carry it.
pub fn populate(
  store: &mut GraphStore,
  sources: &SourceSet,
  language: Option<&str>,
) -> Result<Vec<WordRowBinding>> {
  for (id, rec) in sources.authors.iter().enumerate() {
    store.insert_author(Author::new(
      id as i64 + 1,
      &rec.abbreviation,
      rec.full_name.clone(),
      rec.notes.clone(),
    )?);
  }

  for rec in &sources.events {
    store.insert_event(Event {
      event_id:   rec.event_id,
      date:       rec.date,
      name:       rec.name.clone(),
      definition: rec.definition.clone(),
      annotation: rec.annotation.clone(),
      suffix:     rec.suffix.clone(),
    });
  }

  for rec in &sources.settings {
    store.insert_setting(Setting {
      date:         rec.date,
      db_version:   rec.db_version,
      last_word_id: rec.last_word_id,
      db_release:   rec.db_release.clone(),
    });
  }

  for rec in &sources.syllables {
    store.insert_syllable(Syllable {
      name:    rec.name.clone(),
      kind:    rec.kind.clone(),
      allowed: rec.allowed,
    });
  }

  for (id, rec) in sources.types.iter().enumerate() {
    store.insert_type(WordType {
      type_id:     id as i64 + 1,
      type_code:   rec.type_code.clone(),
      type_x:      rec.type_x.clone(),
      group:       rec.group.as_deref().map(TypeGroup::parse),
      parentable:  rec.parentable,
      description: rec.description.clone(),
    });
  }

  let bindings = populate_words(store, sources)?;
  populate_definitions(store, sources, language)?;

  info!(
    words = store.word_count(),
    definitions = store.definition_count(),
    "ingested source set"
  );
  Ok(bindings)
}

fn populate_words(
  store: &mut GraphStore,
  sources: &SourceSet,
) -> Result<Vec<WordRowBinding>> {
  let mut spells: HashMap<i64, Vec<&SpellRecord>> = HashMap::new();
  for spell in &sources.spells {
    spells.entry(spell.legacy_id).or_default().push(spell);
  }

  let mut bindings = Vec::with_capacity(sources.words.len());
  let mut next_word_id: WordId = 1;

  for rec in &sources.words {
    let word_type =
      store.type_by_code(&rec.type_code).ok_or_else(|| Error::UnknownType {
        legacy_id: rec.legacy_id,
        type_code: rec.type_code.clone(),
      })?;
    let type_id = word_type.type_id;
    let group = word_type.group.clone();

    let row_spells = spells
      .get(&rec.legacy_id)
      .filter(|s| !s.is_empty())
      .ok_or(Error::MissingSpell {
        legacy_id: rec.legacy_id,
      })?;

    // The abbreviation token stays on the raw row for the author pass;
    // only the trailing note lands on the word.
    let author_note =
      rec.authors.as_deref().and_then(|raw| split_packed(raw).1);
    let (year, year_note) =
      rec.year.as_deref().map(split_year).unwrap_or((None, None));
    let (rank, rank_note) = match rec.rank.as_deref().map(split_packed) {
      Some((token, note)) => (Some(token.to_string()), note),
      None => (None, None),
    };
    let notes = WordNotes {
      author: author_note,
      year:   year_note,
      rank:   rank_note,
    }
    .into_option();

    let mut word_ids = Vec::with_capacity(row_spells.len());
    for spell in row_spells {
      let word =
        Word::new(next_word_id, rec.legacy_id, &spell.name, type_id, spell.event_start)?
          .with_event_end(spell.event_end_opt())?
          .with_origin(rec.origin.clone(), rec.origin_x.clone())
          .with_match_code(rec.match_code.clone())
          .with_rank(rank.clone())
          .with_year(year)
          .with_notes(notes.clone())
          .with_tid_legacy(rec.tid_legacy);
      word_ids.push(store.insert_word(word));
      next_word_id += 1;
    }

    let name = store
      .word(word_ids[0])
      .map(|w| w.name.clone())
      .unwrap_or_default();
    bindings.push(WordRowBinding {
      record: rec.clone(),
      word_ids,
      type_id,
      group,
      name,
    });
  }

  Ok(bindings)
}

fn populate_definitions(
  store: &mut GraphStore,
  sources: &SourceSet,
  language: Option<&str>,
) -> Result<()> {
  let mut next_definition_id: i64 = 1;

  for rec in &sources.definitions {
    let word_ids: Vec<WordId> = store
      .words_by_legacy_id(rec.legacy_word_id)
      .iter()
      .map(|w| w.word_id)
      .collect();
    if word_ids.is_empty() {
      return Err(Error::UnknownDefinitionWord {
        legacy_word_id: rec.legacy_word_id,
      });
    }

    let (slots, grammar_code) = rec.grammar_parts();
    for word_id in word_ids {
      store.insert_definition(Definition::new(
        next_definition_id,
        word_id,
        rec.position,
        rec.usage.clone(),
        grammar_code.clone(),
        slots,
        rec.case_tags.clone(),
        rec.body.clone(),
        language.map(str::to_string),
      )?);
      next_definition_id += 1;
    }
  }

  Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn packed_subfield_splits_token_from_note() {
    assert_eq!(
      split_packed("JCB/AAR extra note"),
      ("JCB/AAR", Some("extra note".to_string()))
    );
    assert_eq!(split_packed("JCB"), ("JCB", None));
    assert_eq!(split_packed("JCB "), ("JCB", None));
  }

  #[test]
  fn year_subfield_falls_back_to_annotation() {
    assert_eq!(split_year("1975"), (Some(1975), None));
    assert_eq!(
      split_year("1975 revised"),
      (Some(1975), Some("revised".to_string()))
    );
    assert_eq!(split_year("ca. 1980"), (None, Some("ca. 1980".to_string())));
  }
}
