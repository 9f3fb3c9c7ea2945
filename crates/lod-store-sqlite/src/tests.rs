use chrono::NaiveDate;
use lod_core::{
  author::Author,
  definition::Definition,
  event::Event,
  key::Key,
  support::{Setting, Syllable},
  word::{Word, WordNotes},
  word_type::{TypeGroup, WordType},
};
use lod_graph::{GraphRepository, GraphStore};

use crate::SqliteStore;

fn sample_graph() -> GraphStore {
  let mut store = GraphStore::new();

  store.insert_type(WordType {
    type_id:     1,
    type_code:   "C-Prim".to_string(),
    type_x:      "Predicate".to_string(),
    group:       Some(TypeGroup::Prim),
    parentable:  true,
    description: Some("combined primitive".to_string()),
  });
  store.insert_author(
    Author::new(1, "JCB", Some("James Cooke Brown".to_string()), None)
      .unwrap(),
  );
  store.insert_event(Event {
    event_id:   1,
    date:       NaiveDate::from_ymd_opt(1975, 1, 15).unwrap(),
    name:       "Loglan 1".to_string(),
    definition: "Initial vocabulary".to_string(),
    annotation: String::new(),
    suffix:     "L1".to_string(),
  });
  store.insert_setting(Setting {
    date:         NaiveDate::from_ymd_opt(2016, 12, 25)
      .unwrap()
      .and_hms_opt(10, 30, 0),
    db_version:   4,
    last_word_id: 2,
    db_release:   "R46".to_string(),
  });
  store.insert_syllable(Syllable {
    name:    "br".to_string(),
    kind:    "cci".to_string(),
    allowed: Some(true),
  });

  let forli = Word::new(1, 100, "forli", 1, 1)
    .unwrap()
    .with_origin(Some("3/5R mesto | 2/4E test".to_string()), None)
    .with_year(Some(1975))
    .with_notes(Some(WordNotes {
      author: Some("extra note".to_string()),
      year:   None,
      rank:   None,
    }));
  store.insert_word(forli);
  store.insert_word(
    Word::new(2, 101, "formeo", 1, 1)
      .unwrap()
      .with_event_end(Some(2))
      .unwrap(),
  );

  store.insert_definition(
    Definition::new(
      1,
      1,
      1,
      Some("da forli".to_string()),
      Some("v".to_string()),
      Some(2),
      None,
      "is strong, with «force»",
      Some("en".to_string()),
    )
    .unwrap(),
  );
  let key =
    store.insert_key(Key::new(1, "force", Some("en".to_string())).unwrap());

  store.link_author(1, 1);
  store.link_child(1, 2);
  store.link_key(1, key);

  store
}

#[test]
fn persist_then_restore_round_trips_the_graph() {
  let mut repo = SqliteStore::open_in_memory().unwrap();
  let graph = sample_graph();
  repo.persist(&graph).unwrap();

  let restored = repo.restore().unwrap();

  assert_eq!(restored.word_count(), 2);
  assert_eq!(restored.definition_count(), 1);
  assert_eq!(restored.key_count(), 1);

  let forli = restored.words_by_name("forli")[0];
  assert_eq!(forli.word_id, 1);
  assert_eq!(forli.year, Some(1975));
  assert_eq!(
    forli.notes.as_ref().unwrap().author.as_deref(),
    Some("extra note")
  );
  assert_eq!(
    forli.origin.as_deref(),
    Some("3/5R mesto | 2/4E test")
  );

  let formeo = restored.words_by_name("formeo")[0];
  assert_eq!(formeo.event_end_id, Some(2));

  assert_eq!(restored.authors_of(1)[0].abbreviation, "JCB");
  assert_eq!(restored.parents_of(2)[0].name, "forli");
  assert_eq!(restored.keys_of(1)[0].word, "force");

  assert_eq!(restored.settings().len(), 1);
  assert_eq!(restored.syllables()[0].allowed, Some(true));
  assert_eq!(restored.latest_event_id(), Some(1));
}

#[test]
fn persist_replaces_previous_contents() {
  let mut repo = SqliteStore::open_in_memory().unwrap();
  repo.persist(&sample_graph()).unwrap();

  // A second persist with a smaller graph must not leave stale rows.
  let mut small = GraphStore::new();
  small.insert_type(WordType {
    type_id:     1,
    type_code:   "LW".to_string(),
    type_x:      "Little Word".to_string(),
    group:       Some(TypeGroup::Little),
    parentable:  true,
    description: None,
  });
  small.insert_event(Event {
    event_id:   7,
    date:       NaiveDate::from_ymd_opt(1988, 6, 30).unwrap(),
    name:       "GMR".to_string(),
    definition: String::new(),
    annotation: String::new(),
    suffix:     "GMR".to_string(),
  });
  small.insert_word(Word::new(1, 1, "no", 1, 7).unwrap());
  repo.persist(&small).unwrap();

  let restored = repo.restore().unwrap();
  assert_eq!(restored.word_count(), 1);
  assert_eq!(restored.definition_count(), 0);
  assert!(restored.words_by_name("forli").is_empty());
  assert_eq!(restored.latest_event_id(), Some(7));
}

#[test]
fn drop_all_then_create_all_yields_an_empty_store() {
  let mut repo = SqliteStore::open_in_memory().unwrap();
  repo.persist(&sample_graph()).unwrap();

  repo.drop_all().unwrap();
  repo.create_all().unwrap();

  let restored = repo.restore().unwrap();
  assert_eq!(restored.word_count(), 0);
  assert_eq!(restored.latest_event_id(), None);
}
