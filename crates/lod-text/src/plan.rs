//! The ordered file plan: which flat file feeds which record kind, and in
//! which order kinds are imported and exported.
//!
//! This table is the single registry of record kinds — consumers iterate it
//! instead of discovering kinds at runtime. Keys have no file of their own;
//! they are harvested from definition bodies during ingestion.

use std::fmt;

/// One record kind of the flat-file exchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
  Author,
  Definition,
  Event,
  Setting,
  Syllable,
  Type,
  Word,
  WordSpell,
}

impl RecordKind {
  /// Fixed field count of one record line.
  pub fn field_count(self) -> usize {
    match self {
      RecordKind::Author => 3,
      RecordKind::Definition => 7,
      RecordKind::Event => 6,
      RecordKind::Setting => 4,
      RecordKind::Syllable => 3,
      RecordKind::Type => 5,
      RecordKind::Word => 12,
      RecordKind::WordSpell => 7,
    }
  }
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      RecordKind::Author => "Author",
      RecordKind::Definition => "Definition",
      RecordKind::Event => "Event",
      RecordKind::Setting => "Setting",
      RecordKind::Syllable => "Syllable",
      RecordKind::Type => "Type",
      RecordKind::Word => "Word",
      RecordKind::WordSpell => "WordSpell",
    })
  }
}

/// One row of the file plan.
#[derive(Debug, Clone, Copy)]
pub struct FileSpec {
  pub kind:         RecordKind,
  /// Canonical file name within a source directory or URL prefix.
  pub file_name:    &'static str,
  pub import_order: u8,
  pub export_order: u8,
}

/// The full plan, in import order. Base entities come before words, words
/// before definitions; the linker relies on this ordering.
pub const FILE_PLAN: &[FileSpec] = &[
  FileSpec {
    kind:         RecordKind::Author,
    file_name:    "Author.txt",
    import_order: 1,
    export_order: 1,
  },
  FileSpec {
    kind:         RecordKind::Event,
    file_name:    "LexEvent.txt",
    import_order: 2,
    export_order: 3,
  },
  FileSpec {
    kind:         RecordKind::Setting,
    file_name:    "Settings.txt",
    import_order: 3,
    export_order: 4,
  },
  FileSpec {
    kind:         RecordKind::Syllable,
    file_name:    "Syllable.txt",
    import_order: 4,
    export_order: 5,
  },
  FileSpec {
    kind:         RecordKind::Type,
    file_name:    "Type.txt",
    import_order: 5,
    export_order: 6,
  },
  FileSpec {
    kind:         RecordKind::Word,
    file_name:    "Words.txt",
    import_order: 6,
    export_order: 8,
  },
  FileSpec {
    kind:         RecordKind::WordSpell,
    file_name:    "WordSpell.txt",
    import_order: 7,
    export_order: 7,
  },
  FileSpec {
    kind:         RecordKind::Definition,
    file_name:    "WordDefinition.txt",
    import_order: 8,
    export_order: 2,
  },
];

/// Look up the plan row for `kind`.
pub fn file_spec(kind: RecordKind) -> &'static FileSpec {
  FILE_PLAN
    .iter()
    .find(|spec| spec.kind == kind)
    .expect("every RecordKind has a FileSpec row")
}
