//! Event — a versioning checkpoint in the dictionary's history.
//!
//! Words and definitions are tagged with the event range during which they
//! were valid. Events are totally ordered by id; the latest event is the one
//! with the maximum id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::EventId;

/// A lexical event: one published revision of the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:   EventId,
  pub date:       NaiveDate,
  pub name:       String,
  /// Prose description of what changed at this event.
  pub definition: String,
  pub annotation: String,
  /// Filename suffix used when exporting a snapshot of this event.
  pub suffix:     String,
}

impl Event {
  /// The latest event in `events`, by id. `None` on an empty set.
  pub fn latest(events: &[Event]) -> Option<&Event> {
    events.iter().max_by_key(|e| e.event_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn event(id: EventId) -> Event {
    Event {
      event_id:   id,
      date:       NaiveDate::from_ymd_opt(1975, 1, 1).unwrap(),
      name:       format!("event {id}"),
      definition: String::new(),
      annotation: String::new(),
      suffix:     String::new(),
    }
  }

  #[test]
  fn latest_is_max_id() {
    let events = vec![event(2), event(5), event(3)];
    assert_eq!(Event::latest(&events).unwrap().event_id, 5);
  }

  #[test]
  fn latest_of_empty_is_none() {
    assert!(Event::latest(&[]).is_none());
  }
}
