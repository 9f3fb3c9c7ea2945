//! [`SqliteStore`] — the SQLite implementation of
//! [`lod_graph::GraphRepository`].

use std::path::Path;

use lod_core::{
  author::Author,
  definition::Definition,
  event::Event,
  key::Key,
  support::{Setting, Syllable},
  word::Word,
  word_type::WordType,
};
use lod_graph::{GraphRepository, GraphStore};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{
    decode_date, decode_datetime, decode_group, decode_notes, encode_date,
    encode_datetime, encode_group, encode_notes,
  },
  schema::{SCHEMA, TABLES},
};

/// A lexical-graph store backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn })
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn })
  }

  // ── Per-kind write batches ────────────────────────────────────────────────
  // One transaction each: a mid-batch failure rolls back only its own kind.

  /// Clear every table in reverse dependency order, in one transaction.
  /// `persist` always starts from an empty database; the per-kind
  /// transactions that follow only insert.
  fn clear_tables(&mut self) -> Result<()> {
    let tx = self.conn.transaction()?;
    for table in TABLES.iter().rev() {
      tx.execute(&format!("DELETE FROM {table}"), [])?;
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_authors(&mut self, store: &GraphStore) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO authors (author_id, abbreviation, full_name, notes)
         VALUES (?1, ?2, ?3, ?4)",
      )?;
      for author in store.authors() {
        stmt.execute(params![
          author.author_id,
          author.abbreviation,
          author.full_name,
          author.notes,
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_events(&mut self, store: &GraphStore) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO events (event_id, date, name, definition, annotation,
         suffix) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      )?;
      for event in store.events() {
        stmt.execute(params![
          event.event_id,
          encode_date(event.date),
          event.name,
          event.definition,
          event.annotation,
          event.suffix,
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_support(&mut self, store: &GraphStore) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO settings (date, db_version, last_word_id, db_release)
         VALUES (?1, ?2, ?3, ?4)",
      )?;
      for setting in store.settings() {
        stmt.execute(params![
          setting.date.map(encode_datetime),
          setting.db_version,
          setting.last_word_id,
          setting.db_release,
        ])?;
      }
      let mut stmt = tx.prepare(
        "INSERT INTO syllables (name, kind, allowed) VALUES (?1, ?2, ?3)",
      )?;
      for syllable in store.syllables() {
        stmt.execute(params![
          syllable.name,
          syllable.kind,
          syllable.allowed,
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_types(&mut self, store: &GraphStore) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO types (type_id, type_code, type_x, type_group,
         parentable, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      )?;
      for word_type in store.types() {
        stmt.execute(params![
          word_type.type_id,
          word_type.type_code,
          word_type.type_x,
          encode_group(&word_type.group),
          word_type.parentable,
          word_type.description,
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_words(&mut self, store: &GraphStore) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO words (word_id, legacy_id, name, type_id, origin,
         origin_x, match_code, rank, year, notes_json, event_start_id,
         event_end_id, tid_legacy)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
      )?;
      for word in store.words() {
        stmt.execute(params![
          word.word_id,
          word.legacy_id,
          word.name,
          word.type_id,
          word.origin,
          word.origin_x,
          word.match_code,
          word.rank,
          word.year,
          encode_notes(&word.notes)?,
          word.event_start_id,
          word.event_end_id,
          word.tid_legacy,
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_definitions(&mut self, store: &GraphStore) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO definitions (definition_id, word_id, position, usage,
         grammar_code, slots, case_tags, body, language, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
      )?;
      for definition in store.definitions() {
        stmt.execute(params![
          definition.definition_id,
          definition.word_id,
          definition.position,
          definition.usage,
          definition.grammar_code,
          definition.slots,
          definition.case_tags,
          definition.body,
          definition.language,
          definition.notes,
        ])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_keys(&mut self, store: &GraphStore) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(
        "INSERT INTO keys (key_id, word, language) VALUES (?1, ?2, ?3)",
      )?;
      for key in store.keys() {
        stmt.execute(params![key.key_id, key.word, key.language])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn persist_edges(
    &mut self,
    table: &str,
    columns: (&str, &str),
    edges: impl Iterator<Item = (i64, i64)>,
  ) -> Result<()> {
    let tx = self.conn.transaction()?;
    {
      let mut stmt = tx.prepare(&format!(
        "INSERT INTO {table} ({}, {}) VALUES (?1, ?2)",
        columns.0, columns.1
      ))?;
      for (from, to) in edges {
        stmt.execute(params![from, to])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  // ── Restore ───────────────────────────────────────────────────────────────

  fn restore_entities(&self, store: &mut GraphStore) -> Result<()> {
    let mut stmt = self.conn.prepare(
      "SELECT type_id, type_code, type_x, type_group, parentable,
       description FROM types",
    )?;
    let rows = stmt.query_map([], |row| {
      Ok((
        row.get::<_, i64>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, Option<String>>(3)?,
        row.get::<_, bool>(4)?,
        row.get::<_, Option<String>>(5)?,
      ))
    })?;
    for row in rows {
      let (type_id, type_code, type_x, group, parentable, description) = row?;
      store.insert_type(WordType {
        type_id,
        type_code,
        type_x,
        group: decode_group(group.as_deref()),
        parentable,
        description,
      });
    }

    let mut stmt = self.conn.prepare(
      "SELECT author_id, abbreviation, full_name, notes FROM authors",
    )?;
    let rows = stmt.query_map([], |row| {
      Ok(Author {
        author_id:    row.get(0)?,
        abbreviation: row.get(1)?,
        full_name:    row.get(2)?,
        notes:        row.get(3)?,
      })
    })?;
    for author in rows {
      store.insert_author(author?);
    }

    let mut stmt = self.conn.prepare(
      "SELECT event_id, date, name, definition, annotation, suffix
       FROM events",
    )?;
    let rows = stmt.query_map([], |row| {
      Ok((
        row.get::<_, i64>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, String>(5)?,
      ))
    })?;
    for row in rows {
      let (event_id, date, name, definition, annotation, suffix) = row?;
      store.insert_event(Event {
        event_id,
        date: decode_date(&date)?,
        name,
        definition,
        annotation,
        suffix,
      });
    }

    let mut stmt = self.conn.prepare(
      "SELECT date, db_version, last_word_id, db_release FROM settings",
    )?;
    let rows = stmt.query_map([], |row| {
      Ok((
        row.get::<_, Option<String>>(0)?,
        row.get::<_, i64>(1)?,
        row.get::<_, i64>(2)?,
        row.get::<_, String>(3)?,
      ))
    })?;
    for row in rows {
      let (date, db_version, last_word_id, db_release) = row?;
      store.insert_setting(Setting {
        date: date.as_deref().map(decode_datetime).transpose()?,
        db_version,
        last_word_id,
        db_release,
      });
    }

    let mut stmt =
      self.conn.prepare("SELECT name, kind, allowed FROM syllables")?;
    let rows = stmt.query_map([], |row| {
      Ok(Syllable {
        name:    row.get(0)?,
        kind:    row.get(1)?,
        allowed: row.get(2)?,
      })
    })?;
    for syllable in rows {
      store.insert_syllable(syllable?);
    }

    Ok(())
  }

  fn restore_words(&self, store: &mut GraphStore) -> Result<()> {
    let mut stmt = self.conn.prepare(
      "SELECT word_id, legacy_id, name, type_id, origin, origin_x,
       match_code, rank, year, notes_json, event_start_id, event_end_id,
       tid_legacy FROM words",
    )?;
    let rows = stmt.query_map([], |row| {
      Ok((
        Word {
          word_id:        row.get(0)?,
          legacy_id:      row.get(1)?,
          name:           row.get(2)?,
          type_id:        row.get(3)?,
          origin:         row.get(4)?,
          origin_x:       row.get(5)?,
          match_code:     row.get(6)?,
          rank:           row.get(7)?,
          year:           row.get(8)?,
          notes:          None,
          event_start_id: row.get(10)?,
          event_end_id:   row.get(11)?,
          tid_legacy:     row.get(12)?,
        },
        row.get::<_, Option<String>>(9)?,
      ))
    })?;
    for row in rows {
      let (mut word, notes) = row?;
      word.notes = decode_notes(notes.as_deref())?;
      store.insert_word(word);
    }
    Ok(())
  }

  fn restore_definitions_and_keys(
    &self,
    store: &mut GraphStore,
  ) -> Result<()> {
    let mut stmt = self.conn.prepare(
      "SELECT definition_id, word_id, position, usage, grammar_code, slots,
       case_tags, body, language, notes FROM definitions",
    )?;
    let rows = stmt.query_map([], |row| {
      Ok(Definition {
        definition_id: row.get(0)?,
        word_id:       row.get(1)?,
        position:      row.get(2)?,
        usage:         row.get(3)?,
        grammar_code:  row.get(4)?,
        slots:         row.get(5)?,
        case_tags:     row.get(6)?,
        body:          row.get(7)?,
        language:      row.get(8)?,
        notes:         row.get(9)?,
      })
    })?;
    for definition in rows {
      store.insert_definition(definition?);
    }

    let mut stmt =
      self.conn.prepare("SELECT key_id, word, language FROM keys")?;
    let rows = stmt.query_map([], |row| {
      Ok(Key {
        key_id:   row.get(0)?,
        word:     row.get(1)?,
        language: row.get(2)?,
      })
    })?;
    for key in rows {
      store.insert_key(key?);
    }

    Ok(())
  }

  fn restore_edges(&self, store: &mut GraphStore) -> Result<()> {
    let pairs = |sql: &str| -> Result<Vec<(i64, i64)>> {
      let mut stmt = self.conn.prepare(sql)?;
      let rows =
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
      rows.collect::<rusqlite::Result<_>>().map_err(Error::from)
    };

    for (word_id, author_id) in
      pairs("SELECT word_id, author_id FROM connect_authors")?
    {
      store.link_author(word_id, author_id);
    }
    for (parent_id, child_id) in
      pairs("SELECT parent_id, child_id FROM connect_words")?
    {
      store.link_child(parent_id, child_id);
    }
    for (definition_id, key_id) in
      pairs("SELECT definition_id, key_id FROM connect_keys")?
    {
      store.link_key(definition_id, key_id);
    }
    Ok(())
  }
}

impl GraphRepository for SqliteStore {
  type Error = Error;

  fn create_all(&mut self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  fn drop_all(&mut self) -> Result<()> {
    for table in TABLES.iter().rev() {
      self.conn.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
    }
    Ok(())
  }

  fn persist(&mut self, store: &GraphStore) -> Result<()> {
    info!(words = store.word_count(), "persisting graph");
    self.clear_tables()?;
    self.persist_authors(store)?;
    self.persist_events(store)?;
    self.persist_support(store)?;
    self.persist_types(store)?;
    self.persist_words(store)?;
    self.persist_definitions(store)?;
    self.persist_keys(store)?;
    self.persist_edges(
      "connect_authors",
      ("word_id", "author_id"),
      store.author_edges(),
    )?;
    self.persist_edges(
      "connect_words",
      ("parent_id", "child_id"),
      store.child_edges(),
    )?;
    self.persist_edges(
      "connect_keys",
      ("definition_id", "key_id"),
      store.key_edges(),
    )?;
    debug!("graph persisted");
    Ok(())
  }

  fn restore(&mut self) -> Result<GraphStore> {
    let mut store = GraphStore::new();
    self.restore_entities(&mut store)?;
    self.restore_words(&mut store)?;
    self.restore_definitions_and_keys(&mut store)?;
    self.restore_edges(&mut store)?;
    info!(words = store.word_count(), "restored graph");
    Ok(store)
  }
}
