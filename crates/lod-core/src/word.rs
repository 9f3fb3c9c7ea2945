//! Word — the central entity of the lexical graph.
//!
//! A word is immutable once linked; its relationships (authors, parents,
//! derivatives) live in the graph store's edge sets, not on the word itself.
//! Temporal validity is expressed as an event range: `event_start_id` is the
//! event at which the word appeared, `event_end_id` the event at which it
//! was deprecated (`None` = still current).

use serde::{Deserialize, Serialize};

use crate::{Error, EventId, Result, TypeId, WordId};

// ─── Notes ───────────────────────────────────────────────────────────────────

/// Free-text annotations carried by the packed author/year/rank subfields of
/// a flat word record. Whatever follows the first token of each subfield
/// lands here rather than being parsed.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct WordNotes {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub year:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rank:   Option<String>,
}

impl WordNotes {
  pub fn is_empty(&self) -> bool {
    self.author.is_none() && self.year.is_none() && self.rank.is_none()
  }

  /// `None` when no annotation survived, so an absent notes value stays
  /// absent instead of becoming an empty object.
  pub fn into_option(self) -> Option<WordNotes> {
    if self.is_empty() { None } else { Some(self) }
  }
}

// ─── Word ────────────────────────────────────────────────────────────────────

/// A dictionary word. `legacy_id` is the id carried over from the previous
/// database generation; several words may share one legacy id (one per
/// event-scoped spelling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
  pub word_id:        WordId,
  pub legacy_id:      i64,
  /// Display form. Case-sensitive; the name index matches it exactly.
  pub name:           String,
  pub type_id:        TypeId,
  /// Etymological origin formula; grammar depends on the word's type group.
  pub origin:         Option<String>,
  /// Compound gloss ("origin X") — a vernacular rendering of the origin.
  pub origin_x:       Option<String>,
  pub match_code:     Option<String>,
  pub rank:           Option<String>,
  pub year:           Option<i32>,
  pub notes:          Option<WordNotes>,
  pub event_start_id: EventId,
  /// `None` = the word is still current.
  pub event_end_id:   Option<EventId>,
  /// Legacy cross-reference id, kept only for export symmetry.
  pub tid_legacy:     Option<i64>,
}

impl Word {
  /// Construct a word with the required fields; optional fields start empty
  /// and are attached with the `with_*` builders.
  pub fn new(
    word_id: WordId,
    legacy_id: i64,
    name: impl Into<String>,
    type_id: TypeId,
    event_start_id: EventId,
  ) -> Result<Self> {
    let name = name.into();
    if name.is_empty() {
      return Err(Error::EmptyWordName);
    }
    Ok(Self {
      word_id,
      legacy_id,
      name,
      type_id,
      origin: None,
      origin_x: None,
      match_code: None,
      rank: None,
      year: None,
      notes: None,
      event_start_id,
      event_end_id: None,
      tid_legacy: None,
    })
  }

  /// Set the deprecation event. Rejects ranges where the end does not come
  /// strictly after the start.
  pub fn with_event_end(mut self, end: Option<EventId>) -> Result<Self> {
    if let Some(end) = end
      && end <= self.event_start_id
    {
      return Err(Error::EventRangeInverted {
        name:  self.name,
        start: self.event_start_id,
        end,
      });
    }
    self.event_end_id = end;
    Ok(self)
  }

  pub fn with_origin(
    mut self,
    origin: Option<String>,
    origin_x: Option<String>,
  ) -> Self {
    self.origin = origin;
    self.origin_x = origin_x;
    self
  }

  pub fn with_match_code(mut self, match_code: Option<String>) -> Self {
    self.match_code = match_code;
    self
  }

  pub fn with_rank(mut self, rank: Option<String>) -> Self {
    self.rank = rank;
    self
  }

  pub fn with_year(mut self, year: Option<i32>) -> Self {
    self.year = year;
    self
  }

  pub fn with_notes(mut self, notes: Option<WordNotes>) -> Self {
    self.notes = notes;
    self
  }

  pub fn with_tid_legacy(mut self, tid: Option<i64>) -> Self {
    self.tid_legacy = tid;
    self
  }

  /// The temporal-filtering primitive: a word is current as of event `e`
  /// iff it appeared at or before `e` and was not yet deprecated at `e`.
  pub fn is_current_as_of(&self, event_id: EventId) -> bool {
    self.event_start_id <= event_id
      && self.event_end_id.is_none_or(|end| end > event_id)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn word(start: EventId, end: Option<EventId>) -> Word {
    Word::new(1, 100, "forli", 1, start)
      .unwrap()
      .with_event_end(end)
      .unwrap()
  }

  #[test]
  fn empty_name_rejected() {
    assert!(matches!(
      Word::new(1, 100, "", 1, 1),
      Err(Error::EmptyWordName)
    ));
  }

  #[test]
  fn inverted_event_range_rejected() {
    let w = Word::new(1, 100, "forli", 1, 5).unwrap();
    assert!(matches!(
      w.with_event_end(Some(5)),
      Err(Error::EventRangeInverted { start: 5, end: 5, .. })
    ));
  }

  #[test]
  fn scoping_over_event_range() {
    // Event set {1..6}, word valid on [2, 5).
    let w = word(2, Some(5));
    let current: Vec<EventId> =
      (1..=6).filter(|e| w.is_current_as_of(*e)).collect();
    assert_eq!(current, vec![2, 3, 4]);
  }

  #[test]
  fn open_ended_word_is_always_current_after_start() {
    let w = word(3, None);
    assert!(!w.is_current_as_of(2));
    assert!(w.is_current_as_of(3));
    assert!(w.is_current_as_of(600));
  }

  #[test]
  fn empty_notes_collapse_to_none() {
    assert_eq!(WordNotes::default().into_option(), None);
    let notes = WordNotes {
      rank: Some("some say 2.0".to_string()),
      ..WordNotes::default()
    };
    assert!(notes.into_option().is_some());
  }
}
