//! Encoding helpers between domain types and SQLite column text.
//!
//! Dates are stored as ISO 8601 strings, word notes as compact JSON, type
//! groups as their label text.

use chrono::{NaiveDate, NaiveDateTime};
use lod_core::{word::WordNotes, word_type::TypeGroup};

use crate::{Error, Result};

const DATE: &str = "%Y-%m-%d";
const DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn encode_date(d: NaiveDate) -> String {
  d.format(DATE).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE)
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_datetime(dt: NaiveDateTime) -> String {
  dt.format(DATETIME).to_string()
}

pub fn decode_datetime(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DATETIME)
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_notes(notes: &Option<WordNotes>) -> Result<Option<String>> {
  notes
    .as_ref()
    .map(|n| serde_json::to_string(n).map_err(Error::Json))
    .transpose()
}

pub fn decode_notes(s: Option<&str>) -> Result<Option<WordNotes>> {
  s.map(|s| serde_json::from_str(s).map_err(Error::Json)).transpose()
}

pub fn encode_group(group: &Option<TypeGroup>) -> Option<String> {
  group.as_ref().map(|g| g.as_str().to_string())
}

pub fn decode_group(s: Option<&str>) -> Option<TypeGroup> {
  s.map(TypeGroup::parse)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_round_trip() {
    let d = NaiveDate::from_ymd_opt(1988, 6, 30).unwrap();
    assert_eq!(decode_date(&encode_date(d)).unwrap(), d);

    let dt = d.and_hms_opt(10, 30, 0).unwrap();
    assert_eq!(decode_datetime(&encode_datetime(dt)).unwrap(), dt);
  }

  #[test]
  fn absent_notes_stay_absent() {
    assert_eq!(encode_notes(&None).unwrap(), None);
    assert_eq!(decode_notes(None).unwrap(), None);
  }

  #[test]
  fn notes_round_trip_as_json() {
    let notes = Some(WordNotes {
      author: Some("extra note".to_string()),
      year:   None,
      rank:   None,
    });
    let encoded = encode_notes(&notes).unwrap().unwrap();
    assert_eq!(decode_notes(Some(&encoded)).unwrap(), notes);
  }
}
