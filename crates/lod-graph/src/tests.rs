use chrono::NaiveDate;
use lod_core::{
  author::Author,
  definition::Definition,
  event::Event,
  key::Key,
  word::Word,
  word_type::{TypeGroup, WordType},
};

use crate::store::{DerivativeFilter, GraphStore};

fn word_type(id: i64, code: &str, group: TypeGroup) -> WordType {
  WordType {
    type_id:     id,
    type_code:   code.to_string(),
    type_x:      "Predicate".to_string(),
    group:       Some(group),
    parentable:  true,
    description: None,
  }
}

fn event(id: i64) -> Event {
  Event {
    event_id:   id,
    date:       NaiveDate::from_ymd_opt(1975, 1, 1).unwrap(),
    name:       format!("event {id}"),
    definition: String::new(),
    annotation: String::new(),
    suffix:     String::new(),
  }
}

fn author(id: i64, abbr: &str) -> Author {
  Author::new(id, abbr, None, None).unwrap()
}

fn definition(id: i64, word_id: i64, position: i64, body: &str) -> Definition {
  Definition::new(id, word_id, position, None, None, None, None, body, None)
    .unwrap()
}

/// A small graph: two primitives, an affix and two complexes built on them.
fn sample_store() -> GraphStore {
  let mut store = GraphStore::new();

  store.insert_type(word_type(1, "C-Prim", TypeGroup::Prim));
  store.insert_type(word_type(2, "Afx", TypeGroup::Other("Afx".to_string())));
  store.insert_type(word_type(3, "2-Cpx", TypeGroup::Cpx));

  for id in 1..=3 {
    store.insert_event(event(id));
  }

  store.insert_word(Word::new(1, 100, "forli", 1, 1).unwrap());
  store.insert_word(Word::new(2, 101, "matma", 1, 1).unwrap());
  store.insert_word(Word::new(3, 102, "for-", 2, 1).unwrap());
  store.insert_word(Word::new(4, 103, "formeo", 3, 2).unwrap());
  store.insert_word(Word::new(5, 104, "forcea", 3, 2).unwrap());

  store.link_child(1, 3);
  store.link_child(1, 4);
  store.link_child(1, 5);
  store.link_child(2, 4);

  store
}

#[test]
fn inserts_are_idempotent() {
  let mut store = GraphStore::new();
  let w = Word::new(1, 100, "forli", 1, 1).unwrap();
  assert_eq!(store.insert_word(w.clone()), 1);
  assert_eq!(store.insert_word(w), 1);
  assert_eq!(store.word_count(), 1);
  assert_eq!(store.words_by_name("forli").len(), 1);
}

#[test]
fn edge_inserts_are_idempotent() {
  let mut store = sample_store();
  assert!(!store.link_child(1, 4));
  assert_eq!(store.child_edges().filter(|&(p, _)| p == 1).count(), 3);
}

#[test]
fn author_edges_go_both_ways() {
  let mut store = sample_store();
  store.insert_author(author(1, "JCB"));
  store.insert_author(author(2, "AAR"));
  assert!(store.link_author(1, 2));
  assert!(store.link_author(1, 1));

  let abbrs: Vec<&str> = store
    .authors_of(1)
    .iter()
    .map(|a| a.abbreviation.as_str())
    .collect();
  assert_eq!(abbrs, vec!["AAR", "JCB"]);

  let names: Vec<&str> =
    store.words_of_author(1).iter().map(|w| w.name.as_str()).collect();
  assert_eq!(names, vec!["forli"]);
}

#[test]
fn derivatives_come_back_ordered_by_name() {
  let store = sample_store();
  let names: Vec<&str> = store
    .derivatives_of(1, &DerivativeFilter::default())
    .iter()
    .map(|w| w.name.as_str())
    .collect();
  assert_eq!(names, vec!["for-", "forcea", "formeo"]);
}

#[test]
fn derivative_filters_restrict_by_type() {
  let store = sample_store();

  let affixes: Vec<&str> =
    store.affixes_of(1).iter().map(|w| w.name.as_str()).collect();
  assert_eq!(affixes, vec!["for-"]);

  let complexes: Vec<&str> =
    store.complexes_of(1).iter().map(|w| w.name.as_str()).collect();
  assert_eq!(complexes, vec!["forcea", "formeo"]);

  assert!(store.derivatives_of(1, &DerivativeFilter::with_type_code("LW")).is_empty());
}

#[test]
fn parents_of_a_complex() {
  let store = sample_store();
  let parents: Vec<&str> =
    store.parents_of(4).iter().map(|w| w.name.as_str()).collect();
  assert_eq!(parents, vec!["forli", "matma"]);
}

#[test]
fn keys_deduplicate_on_identity() {
  let mut store = GraphStore::new();
  let first = store.insert_key(Key::new(1, "strong", Some("en".to_string())).unwrap());
  let dup = store.insert_key(Key::new(7, "strong", Some("en".to_string())).unwrap());
  let other_lang =
    store.insert_key(Key::new(2, "strong", Some("de".to_string())).unwrap());

  assert_eq!(first, dup);
  assert_ne!(first, other_lang);
  assert_eq!(store.key_count(), 2);
  assert_eq!(store.next_key_id(), 3);
}

#[test]
fn key_edges_support_reverse_lookup() {
  let mut store = sample_store();
  store.insert_definition(definition(1, 1, 1, "is strong"));
  store.insert_definition(definition(2, 2, 1, "is a mother of"));
  let key = store.insert_key(Key::new(1, "strong", None).unwrap());
  store.link_key(1, key);

  let keys: Vec<&str> = store.keys_of(1).iter().map(|k| k.word.as_str()).collect();
  assert_eq!(keys, vec!["strong"]);
  let definitions: Vec<i64> = store
    .definitions_of_key(key)
    .iter()
    .map(|d| d.definition_id)
    .collect();
  assert_eq!(definitions, vec![1]);
}

#[test]
fn definitions_come_back_in_position_order() {
  let mut store = sample_store();
  store.insert_definition(definition(10, 1, 2, "second sense"));
  store.insert_definition(definition(11, 1, 1, "first sense"));

  let positions: Vec<i64> =
    store.definitions_of(1).iter().map(|d| d.position).collect();
  assert_eq!(positions, vec![1, 2]);
}

#[test]
fn duplicate_definition_positions_collapse_to_the_first() {
  let mut store = sample_store();
  let first = store.insert_definition(definition(1, 1, 1, "is strong"));
  let dup = store.insert_definition(definition(2, 1, 1, "is powerful"));

  assert_eq!(first, dup);
  assert_eq!(store.definition_count(), 1);
  let positions: Vec<i64> =
    store.definitions_of(1).iter().map(|d| d.position).collect();
  assert_eq!(positions, vec![1]);

  // The same position on another word is a distinct definition.
  let other = store.insert_definition(definition(3, 2, 1, "is a mother of"));
  assert_ne!(first, other);
  assert_eq!(store.definition_count(), 2);
}

#[test]
fn words_as_of_defaults_to_latest_event() {
  let mut store = sample_store();
  // Deprecate "matma" at event 3.
  let replaced = Word::new(2, 101, "matma", 1, 1)
    .unwrap()
    .with_event_end(Some(3))
    .unwrap();
  store.clear();
  store.insert_type(word_type(1, "C-Prim", TypeGroup::Prim));
  for id in 1..=3 {
    store.insert_event(event(id));
  }
  store.insert_word(Word::new(1, 100, "forli", 1, 1).unwrap());
  store.insert_word(replaced);

  assert_eq!(store.latest_event_id(), Some(3));
  let latest: Vec<&str> =
    store.words_as_of(None).iter().map(|w| w.name.as_str()).collect();
  assert_eq!(latest, vec!["forli"]);

  let earlier: Vec<&str> =
    store.words_as_of(Some(2)).iter().map(|w| w.name.as_str()).collect();
  assert_eq!(earlier, vec!["forli", "matma"]);
}

#[test]
fn words_as_of_on_an_empty_store_is_empty() {
  let store = GraphStore::new();
  assert_eq!(store.latest_event_id(), None);
  assert!(store.words_as_of(None).is_empty());
}

#[test]
fn clearing_one_edge_kind_leaves_the_others() {
  let mut store = sample_store();
  store.insert_author(author(1, "JCB"));
  store.link_author(1, 1);

  store.clear_word_edges();
  assert_eq!(store.child_edges().count(), 0);
  assert_eq!(store.author_edges().count(), 1);
}

#[test]
fn shared_names_and_legacy_ids_keep_every_word() {
  let mut store = GraphStore::new();
  store.insert_word(
    Word::new(1, 100, "brana", 1, 1).unwrap().with_event_end(Some(2)).unwrap(),
  );
  store.insert_word(Word::new(2, 100, "brana", 1, 2).unwrap());

  assert_eq!(store.words_by_name("brana").len(), 2);
  assert_eq!(store.words_by_legacy_id(100).len(), 2);
}
