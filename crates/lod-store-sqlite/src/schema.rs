//! SQL schema for the LOD SQLite store.
//!
//! Executed at connection startup and by `create_all`; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`. Migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS authors (
    author_id    INTEGER PRIMARY KEY,
    abbreviation TEXT NOT NULL UNIQUE,
    full_name    TEXT,
    notes        TEXT
);

CREATE TABLE IF NOT EXISTS events (
    event_id   INTEGER PRIMARY KEY,
    date       TEXT NOT NULL,    -- ISO 8601 date
    name       TEXT NOT NULL,
    definition TEXT NOT NULL,
    annotation TEXT NOT NULL,
    suffix     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    date         TEXT,
    db_version   INTEGER NOT NULL,
    last_word_id INTEGER NOT NULL,
    db_release   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS syllables (
    name    TEXT NOT NULL,
    kind    TEXT NOT NULL,
    allowed INTEGER             -- boolean, NULL = unspecified
);

CREATE TABLE IF NOT EXISTS types (
    type_id     INTEGER PRIMARY KEY,
    type_code   TEXT NOT NULL UNIQUE,
    type_x      TEXT NOT NULL,
    type_group  TEXT,
    parentable  INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS words (
    word_id        INTEGER PRIMARY KEY,
    legacy_id      INTEGER NOT NULL,
    name           TEXT NOT NULL,
    type_id        INTEGER NOT NULL REFERENCES types(type_id),
    origin         TEXT,
    origin_x       TEXT,
    match_code     TEXT,
    rank           TEXT,
    year           INTEGER,
    notes_json     TEXT,         -- JSON-encoded WordNotes or NULL
    event_start_id INTEGER NOT NULL,
    event_end_id   INTEGER,      -- NULL = still current
    tid_legacy     INTEGER
);

CREATE TABLE IF NOT EXISTS definitions (
    definition_id INTEGER PRIMARY KEY,
    word_id       INTEGER NOT NULL REFERENCES words(word_id),
    position      INTEGER NOT NULL,
    usage         TEXT,
    grammar_code  TEXT,
    slots         INTEGER,
    case_tags     TEXT,
    body          TEXT NOT NULL,
    language      TEXT,
    notes         TEXT,
    UNIQUE (word_id, position)
);

CREATE TABLE IF NOT EXISTS keys (
    key_id   INTEGER PRIMARY KEY,
    word     TEXT NOT NULL,
    language TEXT,
    UNIQUE (word, language)
);

CREATE TABLE IF NOT EXISTS connect_authors (
    word_id   INTEGER NOT NULL REFERENCES words(word_id),
    author_id INTEGER NOT NULL REFERENCES authors(author_id),
    PRIMARY KEY (word_id, author_id)
);

CREATE TABLE IF NOT EXISTS connect_words (
    parent_id INTEGER NOT NULL REFERENCES words(word_id),
    child_id  INTEGER NOT NULL REFERENCES words(word_id),
    PRIMARY KEY (parent_id, child_id),
    CHECK (parent_id != child_id)
);

CREATE TABLE IF NOT EXISTS connect_keys (
    definition_id INTEGER NOT NULL REFERENCES definitions(definition_id),
    key_id        INTEGER NOT NULL REFERENCES keys(key_id),
    PRIMARY KEY (definition_id, key_id)
);

CREATE INDEX IF NOT EXISTS words_name_idx   ON words(name);
CREATE INDEX IF NOT EXISTS words_legacy_idx ON words(legacy_id);
CREATE INDEX IF NOT EXISTS definitions_word_idx ON definitions(word_id);

PRAGMA user_version = 1;
";

/// Tables in insertion order; dropped in reverse for foreign keys.
pub const TABLES: &[&str] = &[
  "authors",
  "events",
  "settings",
  "syllables",
  "types",
  "words",
  "definitions",
  "keys",
  "connect_authors",
  "connect_words",
  "connect_keys",
];
