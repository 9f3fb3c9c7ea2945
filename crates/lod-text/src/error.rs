//! Error types for the lod-text codec.

use thiserror::Error;

use crate::plan::RecordKind;

#[derive(Debug, Error)]
pub enum Error {
  /// The line does not have the fixed field count of its record kind.
  #[error(
    "malformed {kind} record: expected {expected} fields, got {got}: {line:?}"
  )]
  FieldCount {
    kind:     RecordKind,
    expected: usize,
    got:      usize,
    line:     String,
  },

  #[error("malformed {kind} record: field {field:?} is not a number: {value:?}")]
  InvalidNumber {
    kind:  RecordKind,
    field: &'static str,
    value: String,
  },

  #[error("malformed {kind} record: field {field:?} is not a date: {value:?}")]
  InvalidDate {
    kind:  RecordKind,
    field: &'static str,
    value: String,
  },

  /// Booleans are the literal tokens `True` / `False`.
  #[error(
    "malformed {kind} record: field {field:?} is not a boolean: {value:?}"
  )]
  InvalidBool {
    kind:  RecordKind,
    field: &'static str,
    value: String,
  },

  /// The format has no escaping mechanism, so a field containing the
  /// separator (or a newline) cannot be serialized.
  #[error("{kind} field contains the separator or a newline: {value:?}")]
  SeparatorInField { kind: RecordKind, value: String },

  #[error("i/o error reading {source_path}: {inner}")]
  Io {
    source_path: String,
    inner:       std::io::Error,
  },

  #[error("http error fetching {url}: {inner}")]
  Http { url: String, inner: reqwest::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
