//! Typed records for each flat-file entity kind.
//!
//! A record is the raw, denormalized shape of one line: packed subfields
//! (authors + note, year + note, used-in lists) stay packed here. Ingestion
//! into canonical entities happens downstream; this module only guarantees
//! field count, field typing and exact parse/serialize symmetry.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
  error::{Error, Result},
  plan::RecordKind,
};

/// Event dates are written `MM/DD/YYYY` in the source tables.
pub const EVENT_DATE_FORMAT: &str = "%m/%d/%Y";
/// Setting dates are written `DD.MM.YYYY HH:MM:SS`. The asymmetry with
/// [`EVENT_DATE_FORMAT`] is part of the format, not a parsing heuristic.
pub const SETTING_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// The open-ended sentinel in WordSpell `event_end` fields.
pub const EVENT_END_OPEN: i64 = 9999;

// ─── Record trait ────────────────────────────────────────────────────────────

/// A fixed-width delimited record. `from_fields` receives exactly
/// `KIND.field_count()` fields; `to_fields` must return the same count.
pub trait Record: Sized {
  const KIND: RecordKind;

  fn from_fields(fields: &[&str]) -> Result<Self>;
  fn to_fields(&self) -> Vec<String>;
}

// ─── Field helpers ───────────────────────────────────────────────────────────

/// Empty string ⇄ `None` for all optional fields.
fn opt(s: &str) -> Option<String> {
  if s.is_empty() { None } else { Some(s.to_string()) }
}

fn opt_out(o: &Option<String>) -> String {
  o.clone().unwrap_or_default()
}

fn int(kind: RecordKind, field: &'static str, s: &str) -> Result<i64> {
  s.trim().parse().map_err(|_| Error::InvalidNumber {
    kind,
    field,
    value: s.to_string(),
  })
}

fn opt_int(
  kind: RecordKind,
  field: &'static str,
  s: &str,
) -> Result<Option<i64>> {
  if s.is_empty() {
    Ok(None)
  } else {
    int(kind, field, s).map(Some)
  }
}

/// Language-native boolean literals.
fn bool_token(kind: RecordKind, field: &'static str, s: &str) -> Result<bool> {
  match s {
    "True" => Ok(true),
    "False" => Ok(false),
    other => Err(Error::InvalidBool {
      kind,
      field,
      value: other.to_string(),
    }),
  }
}

fn bool_out(b: bool) -> String {
  if b { "True" } else { "False" }.to_string()
}

fn date(
  kind: RecordKind,
  field: &'static str,
  s: &str,
  format: &str,
) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, format).map_err(|_| Error::InvalidDate {
    kind,
    field,
    value: s.to_string(),
  })
}

// ─── Author ──────────────────────────────────────────────────────────────────

/// `Author.txt`: abbreviation @ full_name @ notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
  pub abbreviation: String,
  pub full_name:    Option<String>,
  pub notes:        Option<String>,
}

impl Record for AuthorRecord {
  const KIND: RecordKind = RecordKind::Author;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    Ok(Self {
      abbreviation: fields[0].to_string(),
      full_name:    opt(fields[1]),
      notes:        opt(fields[2]),
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.abbreviation.clone(),
      opt_out(&self.full_name),
      opt_out(&self.notes),
    ]
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// `LexEvent.txt`: id @ name @ date @ definition @ annotation @ suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
  pub event_id:   i64,
  pub name:       String,
  pub date:       NaiveDate,
  pub definition: String,
  pub annotation: String,
  pub suffix:     String,
}

impl Record for EventRecord {
  const KIND: RecordKind = RecordKind::Event;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    Ok(Self {
      event_id:   int(Self::KIND, "id", fields[0])?,
      name:       fields[1].to_string(),
      date:       date(Self::KIND, "date", fields[2], EVENT_DATE_FORMAT)?,
      definition: fields[3].to_string(),
      annotation: fields[4].to_string(),
      suffix:     fields[5].to_string(),
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.event_id.to_string(),
      self.name.clone(),
      self.date.format(EVENT_DATE_FORMAT).to_string(),
      self.definition.clone(),
      self.annotation.clone(),
      self.suffix.clone(),
    ]
  }
}

// ─── Setting ─────────────────────────────────────────────────────────────────

/// `Settings.txt`: date @ db_version @ last_word_id @ db_release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingRecord {
  pub date:         Option<NaiveDateTime>,
  pub db_version:   i64,
  pub last_word_id: i64,
  pub db_release:   String,
}

impl Record for SettingRecord {
  const KIND: RecordKind = RecordKind::Setting;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    let date = if fields[0].is_empty() {
      None
    } else {
      Some(
        NaiveDateTime::parse_from_str(fields[0], SETTING_DATE_FORMAT)
          .map_err(|_| Error::InvalidDate {
            kind:  Self::KIND,
            field: "date",
            value: fields[0].to_string(),
          })?,
      )
    };
    Ok(Self {
      date,
      db_version: int(Self::KIND, "db_version", fields[1])?,
      last_word_id: int(Self::KIND, "last_word_id", fields[2])?,
      db_release: fields[3].to_string(),
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self
        .date
        .map(|d| d.format(SETTING_DATE_FORMAT).to_string())
        .unwrap_or_default(),
      self.db_version.to_string(),
      self.last_word_id.to_string(),
      self.db_release.clone(),
    ]
  }
}

// ─── Syllable ────────────────────────────────────────────────────────────────

/// `Syllable.txt`: name @ type @ allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllableRecord {
  pub name:    String,
  pub kind:    String,
  pub allowed: Option<bool>,
}

impl Record for SyllableRecord {
  const KIND: RecordKind = RecordKind::Syllable;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    let allowed = if fields[2].is_empty() {
      None
    } else {
      Some(bool_token(Self::KIND, "allowed", fields[2])?)
    };
    Ok(Self {
      name: fields[0].to_string(),
      kind: fields[1].to_string(),
      allowed,
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.name.clone(),
      self.kind.clone(),
      self.allowed.map(bool_out).unwrap_or_default(),
    ]
  }
}

// ─── Type ────────────────────────────────────────────────────────────────────

/// `Type.txt`: type @ type_x @ group @ parentable @ description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRecord {
  pub type_code:   String,
  pub type_x:      String,
  pub group:       Option<String>,
  pub parentable:  bool,
  pub description: Option<String>,
}

impl Record for TypeRecord {
  const KIND: RecordKind = RecordKind::Type;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    Ok(Self {
      type_code:   fields[0].to_string(),
      type_x:      fields[1].to_string(),
      group:       opt(fields[2]),
      parentable:  bool_token(Self::KIND, "parentable", fields[3])?,
      description: opt(fields[4]),
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.type_code.clone(),
      self.type_x.clone(),
      opt_out(&self.group),
      bool_out(self.parentable),
      opt_out(&self.description),
    ]
  }
}

// ─── Word ────────────────────────────────────────────────────────────────────

/// `Words.txt`: legacy_id @ type @ type_x @ affixes @ match @ authors
/// @ year @ rank @ origin @ origin_x @ used_in @ tid
///
/// The authors/year/rank subfields stay packed (`"JCB/AAR extra note"`):
/// their first token is data, everything after the first space is a note.
/// Ingestion splits them; this record preserves them byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
  pub legacy_id:  i64,
  pub type_code:  String,
  pub type_x:     String,
  /// Space-separated affix names, stored without hyphens.
  pub affixes:    Option<String>,
  pub match_code: Option<String>,
  pub authors:    Option<String>,
  pub year:       Option<String>,
  pub rank:       Option<String>,
  pub origin:     Option<String>,
  pub origin_x:   Option<String>,
  /// ` | `-separated display names of derivatives this word is used in.
  pub used_in:    Option<String>,
  pub tid_legacy: Option<i64>,
}

impl Record for WordRecord {
  const KIND: RecordKind = RecordKind::Word;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    Ok(Self {
      legacy_id:  int(Self::KIND, "legacy_id", fields[0])?,
      type_code:  fields[1].to_string(),
      type_x:     fields[2].to_string(),
      affixes:    opt(fields[3]),
      match_code: opt(fields[4]),
      authors:    opt(fields[5]),
      year:       opt(fields[6]),
      rank:       opt(fields[7]),
      origin:     opt(fields[8]),
      origin_x:   opt(fields[9]),
      used_in:    opt(fields[10]),
      tid_legacy: opt_int(Self::KIND, "tid", fields[11])?,
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.legacy_id.to_string(),
      self.type_code.clone(),
      self.type_x.clone(),
      opt_out(&self.affixes),
      opt_out(&self.match_code),
      opt_out(&self.authors),
      opt_out(&self.year),
      opt_out(&self.rank),
      opt_out(&self.origin),
      opt_out(&self.origin_x),
      opt_out(&self.used_in),
      self
        .tid_legacy
        .map(|t| t.to_string())
        .unwrap_or_default(),
    ]
  }
}

// ─── WordSpell ───────────────────────────────────────────────────────────────

/// `WordSpell.txt`: legacy_id @ name @ name_lower @ case_code
/// @ event_start @ event_end @ (reserved)
///
/// One spell row per event-scoped display form; `event_end` 9999 means the
/// form is still current.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpellRecord {
  pub legacy_id:   i64,
  pub name:        String,
  pub name_lower:  String,
  /// Capitalisation mask: `0` for an uppercase letter, `5` for lowercase.
  pub case_code:   String,
  pub event_start: i64,
  pub event_end:   i64,
}

impl SpellRecord {
  /// `event_end` with the open-ended sentinel decoded.
  pub fn event_end_opt(&self) -> Option<i64> {
    (self.event_end < EVENT_END_OPEN).then_some(self.event_end)
  }
}

impl Record for SpellRecord {
  const KIND: RecordKind = RecordKind::WordSpell;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    Ok(Self {
      legacy_id:   int(Self::KIND, "legacy_id", fields[0])?,
      name:        fields[1].to_string(),
      name_lower:  fields[2].to_string(),
      case_code:   fields[3].to_string(),
      event_start: int(Self::KIND, "event_start", fields[4])?,
      event_end:   int(Self::KIND, "event_end", fields[5])?,
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.legacy_id.to_string(),
      self.name.clone(),
      self.name_lower.clone(),
      self.case_code.clone(),
      self.event_start.to_string(),
      self.event_end.to_string(),
      String::new(),
    ]
  }
}

// ─── Definition ──────────────────────────────────────────────────────────────

/// `WordDefinition.txt`: legacy_word_id @ position @ usage @ grammar
/// @ body @ (reserved) @ case_tags
///
/// `grammar` packs the slot count and grammar code into one token (`"2v"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefinitionRecord {
  pub legacy_word_id: i64,
  pub position:       i64,
  pub usage:          Option<String>,
  pub grammar:        Option<String>,
  pub body:           String,
  pub case_tags:      Option<String>,
}

impl DefinitionRecord {
  /// Split the packed grammar token into `(slots, code)` — leading digit(s)
  /// are the slot count, the non-digit remainder is the code.
  pub fn grammar_parts(&self) -> (Option<u8>, Option<String>) {
    let Some(grammar) = &self.grammar else {
      return (None, None);
    };
    let digits: String =
      grammar.chars().take_while(|c| c.is_ascii_digit()).collect();
    let code: String =
      grammar.chars().skip_while(|c| c.is_ascii_digit()).collect();
    (
      digits.parse().ok(),
      if code.is_empty() { None } else { Some(code) },
    )
  }
}

impl Record for DefinitionRecord {
  const KIND: RecordKind = RecordKind::Definition;

  fn from_fields(fields: &[&str]) -> Result<Self> {
    Ok(Self {
      legacy_word_id: int(Self::KIND, "legacy_word_id", fields[0])?,
      position:       int(Self::KIND, "position", fields[1])?,
      usage:          opt(fields[2]),
      grammar:        opt(fields[3]),
      body:           fields[4].to_string(),
      case_tags:      opt(fields[6]),
    })
  }

  fn to_fields(&self) -> Vec<String> {
    vec![
      self.legacy_word_id.to_string(),
      self.position.to_string(),
      opt_out(&self.usage),
      opt_out(&self.grammar),
      self.body.clone(),
      String::new(),
      opt_out(&self.case_tags),
    ]
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn grammar_parts_split_digits_from_code() {
    let rec = DefinitionRecord {
      legacy_word_id: 1,
      position:       1,
      usage:          None,
      grammar:        Some("2v".to_string()),
      body:           "x".to_string(),
      case_tags:      None,
    };
    assert_eq!(rec.grammar_parts(), (Some(2), Some("v".to_string())));
  }

  #[test]
  fn grammar_parts_tolerate_code_only_and_slots_only() {
    let mut rec = DefinitionRecord {
      legacy_word_id: 1,
      position:       1,
      usage:          None,
      grammar:        Some("af".to_string()),
      body:           "x".to_string(),
      case_tags:      None,
    };
    assert_eq!(rec.grammar_parts(), (None, Some("af".to_string())));
    rec.grammar = Some("3".to_string());
    assert_eq!(rec.grammar_parts(), (Some(3), None));
    rec.grammar = None;
    assert_eq!(rec.grammar_parts(), (None, None));
  }

  #[test]
  fn spell_event_end_sentinel_decodes_to_none() {
    let rec = SpellRecord {
      legacy_id:   1,
      name:        "forli".to_string(),
      name_lower:  "forli".to_string(),
      case_code:   "55555".to_string(),
      event_start: 1,
      event_end:   EVENT_END_OPEN,
    };
    assert_eq!(rec.event_end_opt(), None);
    let closed = SpellRecord {
      event_end: 5,
      ..rec
    };
    assert_eq!(closed.event_end_opt(), Some(5));
  }
}
