//! Supporting metadata entities with no relationship complexity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A snapshot of the source database's bookkeeping settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
  pub date:         Option<NaiveDateTime>,
  pub db_version:   i64,
  pub last_word_id: i64,
  pub db_release:   String,
}

/// A phonological syllable-pattern record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syllable {
  pub name:    String,
  pub kind:    String,
  pub allowed: Option<bool>,
}
