//! Flat-file codec for the LOD exchange format.
//!
//! One record per line, fields separated by a single configurable character
//! (default `@`), no escaping. Every entity kind has a fixed field count; a
//! missing optional field is an empty string between separators, never an
//! omitted field. Parsing is pure and restartable; `parse(serialize(r))`
//! returns `r` for every record kind as long as no field contains the
//! separator.
//!
//! # Quick start
//!
//! ```no_run
//! use lod_text::{DEFAULT_SEPARATOR, parse_line, record::AuthorRecord};
//!
//! let rec: AuthorRecord =
//!   parse_line("JCB@James Cooke Brown@Founder", DEFAULT_SEPARATOR).unwrap();
//! assert_eq!(rec.abbreviation, "JCB");
//! ```

pub mod error;
pub mod fetch;
pub mod plan;
pub mod record;

pub use error::{Error, Result};
pub use fetch::{AutoFetcher, FileFetcher, HttpFetcher, SourceFetcher};
pub use plan::{FILE_PLAN, FileSpec, RecordKind, file_spec};
pub use record::Record;

/// The separator used by all published LOD tables.
pub const DEFAULT_SEPARATOR: char = '@';

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse one line into a typed record. Fails with a field-count error when
/// the line does not have exactly the kind's fixed number of fields.
pub fn parse_line<R: Record>(line: &str, separator: char) -> Result<R> {
  let fields: Vec<&str> = line.split(separator).collect();
  let expected = R::KIND.field_count();
  if fields.len() != expected {
    return Err(Error::FieldCount {
      kind: R::KIND,
      expected,
      got: fields.len(),
      line: line.to_string(),
    });
  }
  R::from_fields(&fields)
}

/// Lazily parse a sequence of lines. Each item parses independently; no
/// state is shared across calls, so the iterator can be dropped and the
/// lines re-parsed from the start at any time.
pub fn parse_lines<'a, R, I>(
  lines: I,
  separator: char,
) -> impl Iterator<Item = Result<R>> + 'a
where
  R: Record + 'a,
  I: IntoIterator<Item = &'a str> + 'a,
{
  lines
    .into_iter()
    .filter(|l| !l.trim().is_empty())
    .map(move |l| parse_line(l, separator))
}

/// Parse all lines, failing on the first malformed record. One bad line
/// aborts the whole entity kind — partial kinds are never produced.
pub fn parse_all<'a, R, I>(lines: I, separator: char) -> Result<Vec<R>>
where
  R: Record + 'a,
  I: IntoIterator<Item = &'a str> + 'a,
{
  parse_lines(lines, separator).collect()
}

// ─── Serialization ───────────────────────────────────────────────────────────

/// Serialize one record to a line. The format has no escaping, so a field
/// containing the separator or a newline is an error, not a mangled line.
pub fn serialize_line<R: Record>(record: &R, separator: char) -> Result<String> {
  let fields = record.to_fields();
  debug_assert_eq!(fields.len(), R::KIND.field_count());
  for field in &fields {
    if field.contains(separator) || field.contains('\n') {
      return Err(Error::SeparatorInField {
        kind:  R::KIND,
        value: field.clone(),
      });
    }
  }
  Ok(fields.join(&separator.to_string()))
}

/// Serialize a full record set, one line per record.
pub fn serialize_all<R: Record>(
  records: &[R],
  separator: char,
) -> Result<Vec<String>> {
  records
    .iter()
    .map(|r| serialize_line(r, separator))
    .collect()
}

// ─── Round-trip tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod roundtrip_tests {
  use chrono::{NaiveDate, NaiveDateTime};

  use super::*;
  use crate::record::{
    AuthorRecord, DefinitionRecord, EventRecord, SettingRecord, SpellRecord,
    SyllableRecord, TypeRecord, WordRecord,
  };

  fn round_trip<R: Record + PartialEq + std::fmt::Debug>(record: R) {
    let line = serialize_line(&record, DEFAULT_SEPARATOR).unwrap();
    let reparsed: R = parse_line(&line, DEFAULT_SEPARATOR).unwrap();
    assert_eq!(reparsed, record, "line was: {line:?}");
  }

  #[test]
  fn author_round_trip() {
    round_trip(AuthorRecord {
      abbreviation: "JCB".to_string(),
      full_name:    Some("James Cooke Brown".to_string()),
      notes:        None,
    });
  }

  #[test]
  fn event_round_trip() {
    round_trip(EventRecord {
      event_id:   3,
      name:       "Randall Cleanup".to_string(),
      date:       NaiveDate::from_ymd_opt(1988, 6, 1).unwrap(),
      definition: "systematic repairs".to_string(),
      annotation: "Cleanup".to_string(),
      suffix:     "RCl".to_string(),
    });
  }

  #[test]
  fn event_date_uses_us_order() {
    let rec = EventRecord {
      event_id:   1,
      name:       "n".to_string(),
      date:       NaiveDate::from_ymd_opt(1975, 12, 31).unwrap(),
      definition: "d".to_string(),
      annotation: "a".to_string(),
      suffix:     "s".to_string(),
    };
    let line = serialize_line(&rec, DEFAULT_SEPARATOR).unwrap();
    assert!(line.contains("@12/31/1975@"));
  }

  #[test]
  fn setting_round_trip_and_date_format() {
    let date = NaiveDateTime::parse_from_str(
      "11.10.2018 09:10:20",
      record::SETTING_DATE_FORMAT,
    )
    .unwrap();
    let rec = SettingRecord {
      date:         Some(date),
      db_version:   16,
      last_word_id: 10141,
      db_release:   "4.97".to_string(),
    };
    let line = serialize_line(&rec, DEFAULT_SEPARATOR).unwrap();
    assert!(line.starts_with("11.10.2018 09:10:20@"));
    round_trip(rec);
  }

  #[test]
  fn syllable_round_trip() {
    round_trip(SyllableRecord {
      name:    "cv".to_string(),
      kind:    "Behind".to_string(),
      allowed: Some(true),
    });
  }

  #[test]
  fn type_round_trip() {
    round_trip(TypeRecord {
      type_code:   "C-Prim".to_string(),
      type_x:      "Predicate".to_string(),
      group:       Some("Prim".to_string()),
      parentable:  true,
      description: Some("Composite Primitive".to_string()),
    });
  }

  #[test]
  fn word_round_trip_with_packed_subfields() {
    round_trip(WordRecord {
      legacy_id:  3571,
      type_code:  "C-Prim".to_string(),
      type_x:     "Predicate".to_string(),
      affixes:    Some("for foy".to_string()),
      match_code: None,
      authors:    Some("JCB/AAR extra note".to_string()),
      year:       Some("1975 some say 1976".to_string()),
      rank:       Some("1.9".to_string()),
      origin:     Some("3/5R mesto | 2/4E test".to_string()),
      origin_x:   None,
      used_in:    Some("foldjacea | forlidga".to_string()),
      tid_legacy: None,
    });
  }

  #[test]
  fn spell_round_trip() {
    round_trip(SpellRecord {
      legacy_id:   3571,
      name:        "forli".to_string(),
      name_lower:  "forli".to_string(),
      case_code:   "55555".to_string(),
      event_start: 1,
      event_end:   9999,
    });
  }

  #[test]
  fn definition_round_trip() {
    round_trip(DefinitionRecord {
      legacy_word_id: 3571,
      position:       1,
      usage:          None,
      grammar:        Some("2v".to_string()),
      body:           "to «test» or «examine»".to_string(),
      case_tags:      Some("K P".to_string()),
    });
  }

  // ── Error paths ───────────────────────────────────────────────────────────

  #[test]
  fn short_line_is_field_count_error() {
    let r: Result<AuthorRecord> = parse_line("JCB@only-two", DEFAULT_SEPARATOR);
    assert!(matches!(
      r,
      Err(Error::FieldCount {
        expected: 3,
        got: 2,
        ..
      })
    ));
  }

  #[test]
  fn bad_number_is_invalid_number_error() {
    let r: Result<EventRecord> =
      parse_line("x@n@06/01/1988@d@a@s", DEFAULT_SEPARATOR);
    assert!(matches!(r, Err(Error::InvalidNumber { .. })));
  }

  #[test]
  fn bad_boolean_is_invalid_bool_error() {
    let r: Result<TypeRecord> =
      parse_line("Afx@Affix@Prim@yes@", DEFAULT_SEPARATOR);
    assert!(matches!(r, Err(Error::InvalidBool { .. })));
  }

  #[test]
  fn separator_inside_field_refuses_to_serialize() {
    let rec = AuthorRecord {
      abbreviation: "J@B".to_string(),
      full_name:    None,
      notes:        None,
    };
    assert!(matches!(
      serialize_line(&rec, DEFAULT_SEPARATOR),
      Err(Error::SeparatorInField { .. })
    ));
  }

  #[test]
  fn parse_lines_is_lazy_and_restartable() {
    let lines = ["JCB@James Cooke Brown@", "AAR@A. A. Rice@"];
    // First partial consumption…
    let first: Vec<Result<AuthorRecord>> =
      parse_lines(lines, DEFAULT_SEPARATOR).take(1).collect();
    assert_eq!(first.len(), 1);
    // …then a fresh full pass over the same lines.
    let all: Result<Vec<AuthorRecord>> = parse_all(lines, DEFAULT_SEPARATOR);
    assert_eq!(all.unwrap().len(), 2);
  }
}
