//! [`GraphStore`] — entities, indexes, edge sets and traversal queries.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use lod_core::{
  AuthorId, DefinitionId, EventId, KeyId, TypeId, WordId,
  author::Author,
  definition::Definition,
  event::Event,
  key::Key,
  support::{Setting, Syllable},
  word::Word,
  word_type::{TypeGroup, WordType},
};
use serde::{Deserialize, Serialize};

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Optional constraints on a derivative traversal. Empty filter = all
/// derivatives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivativeFilter {
  /// Restrict to targets whose type code matches exactly (e.g. `Afx`).
  pub type_code: Option<String>,
  /// Restrict to targets with this extended class label.
  pub type_x:    Option<String>,
  /// Restrict to targets in this type group (e.g. `Cpx`).
  pub group:     Option<TypeGroup>,
}

impl DerivativeFilter {
  pub fn with_type_code(code: &str) -> Self {
    Self {
      type_code: Some(code.to_string()),
      ..Self::default()
    }
  }

  pub fn with_group(group: TypeGroup) -> Self {
    Self {
      group: Some(group),
      ..Self::default()
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The in-memory lexical graph. The only shared mutable state of a rebuild
/// run; built once, then queried.
#[derive(Debug, Default)]
pub struct GraphStore {
  words:       BTreeMap<WordId, Word>,
  types:       BTreeMap<TypeId, WordType>,
  authors:     BTreeMap<AuthorId, Author>,
  events:      BTreeMap<EventId, Event>,
  definitions: BTreeMap<DefinitionId, Definition>,
  keys:        BTreeMap<KeyId, Key>,
  settings:    Vec<Setting>,
  syllables:   Vec<Syllable>,

  // Secondary indexes.
  words_by_name:           BTreeMap<String, Vec<WordId>>,
  words_by_legacy_id:      HashMap<i64, Vec<WordId>>,
  types_by_code:           HashMap<String, TypeId>,
  authors_by_abbr:         HashMap<String, AuthorId>,
  keys_by_identity:        HashMap<(String, Option<String>), KeyId>,
  definitions_by_word:     HashMap<WordId, Vec<DefinitionId>>,
  definitions_by_position: HashMap<(WordId, i64), DefinitionId>,

  // Edge sets, maintained in both directions.
  word_authors:    BTreeMap<WordId, BTreeSet<AuthorId>>,
  author_words:    BTreeMap<AuthorId, BTreeSet<WordId>>,
  children:        BTreeMap<WordId, BTreeSet<WordId>>,
  parents:         BTreeMap<WordId, BTreeSet<WordId>>,
  definition_keys: BTreeMap<DefinitionId, BTreeSet<KeyId>>,
  key_definitions: BTreeMap<KeyId, BTreeSet<DefinitionId>>,
}

impl GraphStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Drop everything — entities, indexes and edges. The only supported
  /// recovery mechanism after a failed rebuild is a rerun from this state.
  pub fn clear(&mut self) {
    *self = Self::default();
  }

  /// Clear one edge kind so an aborted linking pass can restart from empty
  /// edges without touching the other kinds.
  pub fn clear_author_edges(&mut self) {
    self.word_authors.clear();
    self.author_words.clear();
  }

  pub fn clear_word_edges(&mut self) {
    self.children.clear();
    self.parents.clear();
  }

  pub fn clear_key_edges(&mut self) {
    self.definition_keys.clear();
    self.key_definitions.clear();
  }

  // ── Entity inserts (idempotent per unique key) ────────────────────────────

  /// Insert a word. A second insert with the same id is a no-op.
  pub fn insert_word(&mut self, word: Word) -> WordId {
    let id = word.word_id;
    if self.words.contains_key(&id) {
      return id;
    }
    self
      .words_by_name
      .entry(word.name.clone())
      .or_default()
      .push(id);
    self
      .words_by_legacy_id
      .entry(word.legacy_id)
      .or_default()
      .push(id);
    self.words.insert(id, word);
    id
  }

  pub fn insert_type(&mut self, word_type: WordType) -> TypeId {
    let id = word_type.type_id;
    if self.types.contains_key(&id) {
      return id;
    }
    self
      .types_by_code
      .insert(word_type.type_code.clone(), id);
    self.types.insert(id, word_type);
    id
  }

  pub fn insert_author(&mut self, author: Author) -> AuthorId {
    let id = author.author_id;
    if self.authors.contains_key(&id) {
      return id;
    }
    self
      .authors_by_abbr
      .insert(author.abbreviation.clone(), id);
    self.authors.insert(id, author);
    id
  }

  pub fn insert_event(&mut self, event: Event) -> EventId {
    let id = event.event_id;
    self.events.entry(id).or_insert(event);
    id
  }

  /// Insert a definition. `position` is unique within a word: an insert
  /// matching an existing `(word_id, position)` returns the existing id.
  pub fn insert_definition(&mut self, definition: Definition) -> DefinitionId {
    let id = definition.definition_id;
    if self.definitions.contains_key(&id) {
      return id;
    }
    let identity = (definition.word_id, definition.position);
    if let Some(&existing) = self.definitions_by_position.get(&identity) {
      return existing;
    }
    self.definitions_by_position.insert(identity, id);
    self
      .definitions_by_word
      .entry(definition.word_id)
      .or_default()
      .push(id);
    self.definitions.insert(id, definition);
    id
  }

  /// Insert a key, deduplicating on the `(word, language)` identity: an
  /// insert matching an existing key returns the existing id.
  pub fn insert_key(&mut self, key: Key) -> KeyId {
    let identity = (key.word.clone(), key.language.clone());
    if let Some(&existing) = self.keys_by_identity.get(&identity) {
      return existing;
    }
    let id = key.key_id;
    self.keys_by_identity.insert(identity, id);
    self.keys.insert(id, key);
    id
  }

  pub fn insert_setting(&mut self, setting: Setting) {
    self.settings.push(setting);
  }

  pub fn insert_syllable(&mut self, syllable: Syllable) {
    self.syllables.push(syllable);
  }

  // ── Lookups ───────────────────────────────────────────────────────────────

  pub fn word(&self, id: WordId) -> Option<&Word> {
    self.words.get(&id)
  }

  pub fn word_type(&self, id: TypeId) -> Option<&WordType> {
    self.types.get(&id)
  }

  pub fn author(&self, id: AuthorId) -> Option<&Author> {
    self.authors.get(&id)
  }

  pub fn event(&self, id: EventId) -> Option<&Event> {
    self.events.get(&id)
  }

  pub fn definition(&self, id: DefinitionId) -> Option<&Definition> {
    self.definitions.get(&id)
  }

  pub fn key(&self, id: KeyId) -> Option<&Key> {
    self.keys.get(&id)
  }

  /// Case-sensitive exact name lookup. Several words may share one display
  /// form (one per event range); ids come back in insertion order.
  pub fn words_by_name(&self, name: &str) -> Vec<&Word> {
    self
      .words_by_name
      .get(name)
      .map(|ids| ids.iter().filter_map(|id| self.words.get(id)).collect())
      .unwrap_or_default()
  }

  pub fn words_by_legacy_id(&self, legacy_id: i64) -> Vec<&Word> {
    self
      .words_by_legacy_id
      .get(&legacy_id)
      .map(|ids| ids.iter().filter_map(|id| self.words.get(id)).collect())
      .unwrap_or_default()
  }

  pub fn type_by_code(&self, code: &str) -> Option<&WordType> {
    self.types_by_code.get(code).and_then(|id| self.types.get(id))
  }

  pub fn author_by_abbreviation(&self, abbr: &str) -> Option<&Author> {
    self
      .authors_by_abbr
      .get(abbr)
      .and_then(|id| self.authors.get(id))
  }

  pub fn key_by_identity(
    &self,
    word: &str,
    language: Option<&str>,
  ) -> Option<&Key> {
    let identity = (word.to_string(), language.map(str::to_string));
    self
      .keys_by_identity
      .get(&identity)
      .and_then(|id| self.keys.get(id))
  }

  /// The type of a word, if its type id resolves.
  pub fn type_of(&self, word: &Word) -> Option<&WordType> {
    self.types.get(&word.type_id)
  }

  /// Filtered scan: all words whose type is in `group`.
  pub fn words_in_group(&self, group: &TypeGroup) -> Vec<&Word> {
    let mut result: Vec<&Word> = self
      .words
      .values()
      .filter(|w| self.type_of(w).is_some_and(|t| t.is_group(group)))
      .collect();
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
  }

  /// Filtered scan: all words with the exact type code.
  pub fn words_with_type_code(&self, code: &str) -> Vec<&Word> {
    let mut result: Vec<&Word> = self
      .words
      .values()
      .filter(|w| self.type_of(w).is_some_and(|t| t.type_code == code))
      .collect();
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
  }

  // ── Edge operations (idempotent, both directions in one call) ────────────

  /// Add a word→author edge. Returns `true` if the edge was new.
  pub fn link_author(&mut self, word_id: WordId, author_id: AuthorId) -> bool {
    let inserted = self
      .word_authors
      .entry(word_id)
      .or_default()
      .insert(author_id);
    if inserted {
      self.author_words.entry(author_id).or_default().insert(word_id);
    }
    inserted
  }

  /// Add a parent→child derivation edge. Returns `true` if the edge was new.
  pub fn link_child(&mut self, parent_id: WordId, child_id: WordId) -> bool {
    let inserted = self.children.entry(parent_id).or_default().insert(child_id);
    if inserted {
      self.parents.entry(child_id).or_default().insert(parent_id);
    }
    inserted
  }

  /// Add a definition→key edge. Returns `true` if the edge was new.
  pub fn link_key(
    &mut self,
    definition_id: DefinitionId,
    key_id: KeyId,
  ) -> bool {
    let inserted = self
      .definition_keys
      .entry(definition_id)
      .or_default()
      .insert(key_id);
    if inserted {
      self
        .key_definitions
        .entry(key_id)
        .or_default()
        .insert(definition_id);
    }
    inserted
  }

  // ── Traversals ────────────────────────────────────────────────────────────

  fn sorted_words(&self, ids: impl IntoIterator<Item = WordId>) -> Vec<&Word> {
    let mut result: Vec<&Word> =
      ids.into_iter().filter_map(|id| self.words.get(&id)).collect();
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
  }

  /// Authors of a word, ordered by abbreviation.
  pub fn authors_of(&self, word_id: WordId) -> Vec<&Author> {
    let mut result: Vec<&Author> = self
      .word_authors
      .get(&word_id)
      .into_iter()
      .flatten()
      .filter_map(|id| self.authors.get(id))
      .collect();
    result.sort_by(|a, b| a.abbreviation.cmp(&b.abbreviation));
    result
  }

  /// Words credited to an author, ordered by name.
  pub fn words_of_author(&self, author_id: AuthorId) -> Vec<&Word> {
    self.sorted_words(
      self.author_words.get(&author_id).into_iter().flatten().copied(),
    )
  }

  /// Derivatives of a word matching `filter`, ordered by name ascending.
  pub fn derivatives_of(
    &self,
    word_id: WordId,
    filter: &DerivativeFilter,
  ) -> Vec<&Word> {
    let candidates = self.children.get(&word_id).into_iter().flatten().copied();
    let mut result: Vec<&Word> = candidates
      .filter_map(|id| self.words.get(&id))
      .filter(|w| {
        let Some(t) = self.type_of(w) else {
          return filter.type_code.is_none()
            && filter.type_x.is_none()
            && filter.group.is_none();
        };
        filter
          .type_code
          .as_ref()
          .is_none_or(|code| &t.type_code == code)
          && filter.type_x.as_ref().is_none_or(|x| &t.type_x == x)
          && filter.group.as_ref().is_none_or(|g| t.is_group(g))
      })
      .collect();
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
  }

  /// Parents of a word, ordered by name ascending.
  pub fn parents_of(&self, word_id: WordId) -> Vec<&Word> {
    self.sorted_words(self.parents.get(&word_id).into_iter().flatten().copied())
  }

  /// Affix derivatives of a primitive.
  pub fn affixes_of(&self, word_id: WordId) -> Vec<&Word> {
    self.derivatives_of(word_id, &DerivativeFilter::with_type_code("Afx"))
  }

  /// Complex derivatives of a word.
  pub fn complexes_of(&self, word_id: WordId) -> Vec<&Word> {
    self.derivatives_of(word_id, &DerivativeFilter::with_group(TypeGroup::Cpx))
  }

  /// Definitions of a word, ordered by position.
  pub fn definitions_of(&self, word_id: WordId) -> Vec<&Definition> {
    let mut result: Vec<&Definition> = self
      .definitions_by_word
      .get(&word_id)
      .into_iter()
      .flatten()
      .filter_map(|id| self.definitions.get(id))
      .collect();
    result.sort_by_key(|d| d.position);
    result
  }

  /// Keys linked to a definition, ordered by key word.
  pub fn keys_of(&self, definition_id: DefinitionId) -> Vec<&Key> {
    let mut result: Vec<&Key> = self
      .definition_keys
      .get(&definition_id)
      .into_iter()
      .flatten()
      .filter_map(|id| self.keys.get(id))
      .collect();
    result.sort_by(|a, b| a.word.cmp(&b.word));
    result
  }

  /// Definitions a key is linked from (reverse lookup), ordered by id.
  pub fn definitions_of_key(&self, key_id: KeyId) -> Vec<&Definition> {
    self
      .key_definitions
      .get(&key_id)
      .into_iter()
      .flatten()
      .filter_map(|id| self.definitions.get(id))
      .collect()
  }

  // ── Event scoping ─────────────────────────────────────────────────────────

  /// The latest event id, if any events are loaded.
  pub fn latest_event_id(&self) -> Option<EventId> {
    self.events.keys().next_back().copied()
  }

  /// All words current as of `event_id` (default: latest event), ordered by
  /// name ascending.
  pub fn words_as_of(&self, event_id: Option<EventId>) -> Vec<&Word> {
    let Some(event_id) = event_id.or_else(|| self.latest_event_id()) else {
      return Vec::new();
    };
    let mut result: Vec<&Word> = self
      .words
      .values()
      .filter(|w| w.is_current_as_of(event_id))
      .collect();
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
  }

  /// All definitions current as of `event_id`: a definition is current iff
  /// its source word is.
  pub fn definitions_as_of(&self, event_id: Option<EventId>) -> Vec<&Definition> {
    let Some(event_id) = event_id.or_else(|| self.latest_event_id()) else {
      return Vec::new();
    };
    self
      .definitions
      .values()
      .filter(|d| {
        self
          .words
          .get(&d.word_id)
          .is_some_and(|w| w.is_current_as_of(event_id))
      })
      .collect()
  }

  // ── Iteration / counters (persistence and reporting) ─────────────────────

  pub fn words(&self) -> impl Iterator<Item = &Word> {
    self.words.values()
  }

  pub fn types(&self) -> impl Iterator<Item = &WordType> {
    self.types.values()
  }

  pub fn authors(&self) -> impl Iterator<Item = &Author> {
    self.authors.values()
  }

  pub fn events(&self) -> impl Iterator<Item = &Event> {
    self.events.values()
  }

  pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
    self.definitions.values()
  }

  pub fn keys(&self) -> impl Iterator<Item = &Key> {
    self.keys.values()
  }

  pub fn settings(&self) -> &[Setting] {
    &self.settings
  }

  pub fn syllables(&self) -> &[Syllable] {
    &self.syllables
  }

  pub fn author_edges(&self) -> impl Iterator<Item = (WordId, AuthorId)> + '_ {
    self
      .word_authors
      .iter()
      .flat_map(|(w, authors)| authors.iter().map(move |a| (*w, *a)))
  }

  pub fn child_edges(&self) -> impl Iterator<Item = (WordId, WordId)> + '_ {
    self
      .children
      .iter()
      .flat_map(|(p, children)| children.iter().map(move |c| (*p, *c)))
  }

  pub fn key_edges(&self) -> impl Iterator<Item = (DefinitionId, KeyId)> + '_ {
    self
      .definition_keys
      .iter()
      .flat_map(|(d, keys)| keys.iter().map(move |k| (*d, *k)))
  }

  pub fn word_count(&self) -> usize {
    self.words.len()
  }

  pub fn definition_count(&self) -> usize {
    self.definitions.len()
  }

  pub fn key_count(&self) -> usize {
    self.keys.len()
  }

  /// The next free key id — used by the extraction-based key flow when a
  /// new key is created mid-linking.
  pub fn next_key_id(&self) -> KeyId {
    self.keys.keys().next_back().copied().unwrap_or(0) + 1
  }
}
